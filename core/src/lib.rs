//! # Discovery Engine
//!
//! Finds SSH-reachable hosts on the local segment by running two sources
//! concurrently — passive DNS-SD browsing and active subnet probing — and
//! merging their events into one cancellable stream per scan session.
//!
//! High-level callers talk to [`session::DiscoveryController`] and fold the
//! resulting stream with [`aggregate::ResultAggregator`]; everything else
//! here is the machinery behind those two.

pub mod aggregate;
pub mod browser;
pub mod probe;
pub mod scheduler;
pub mod session;

pub use aggregate::ResultAggregator;
pub use session::{DiscoveryController, ScanState};
