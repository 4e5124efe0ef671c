//! # Discovery Event Stream
//!
//! The vocabulary every scan session speaks over its outgoing channel.
//! Both discovery sources and the session driver produce these; the
//! presentation layer and the result aggregator consume them.

use crate::network::host::DiscoveredHost;

/// Which half of the engine produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiscoverySource {
    /// Passive DNS-SD advertisement browsing.
    ServiceDiscovery,
    /// Active TCP reachability probing of the local subnet.
    ActiveProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Started,
    Finished,
}

/// Lifecycle stream of one scan session.
///
/// Per-source emission order is preserved; events from different sources
/// interleave arbitrarily. `ScanningFinished` is terminal — nothing follows
/// it on the same stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    ScanningStarted,
    SourceStatus {
        source: DiscoverySource,
        status: SourceStatus,
    },
    HostFound(DiscoveredHost),
    /// The platform denied local-network browsing. Emitted at most once per
    /// session; active probing is unaffected.
    PermissionDenied,
    /// A source failed in a way worth telling the user about. Never fatal
    /// to the session.
    Failed { message: String },
    ScanningFinished,
}
