//! TCP reachability probing.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// One timed TCP connect attempt against a single endpoint.
///
/// Implementations own their socket and timer per call and hold no shared
/// mutable state, so any number of probes may run concurrently.
#[async_trait]
pub trait TcpProber: Send + Sync {
    /// Returns the measured latency in milliseconds if `addr` accepted a
    /// connection within `limit`, `None` otherwise.
    async fn probe(&self, addr: SocketAddr, limit: Duration) -> Option<u64>;
}

/// Prober backed by the tokio connector.
pub struct TokioProber;

#[async_trait]
impl TcpProber for TokioProber {
    async fn probe(&self, addr: SocketAddr, limit: Duration) -> Option<u64> {
        let started = Instant::now();
        match timeout(limit, TcpStream::connect(addr)).await {
            // Only a fully established connection counts. A refusal means
            // the host is alive but nothing listens there, which is a miss
            // for our purposes.
            Ok(Ok(stream)) => {
                drop(stream);
                Some(elapsed_ms(started))
            }
            Ok(Err(_)) | Err(_) => None,
        }
    }
}

/// Wall-clock latency, floored at 1ms so downstream sorting and display
/// never see a zero.
fn elapsed_ms(started: Instant) -> u64 {
    (started.elapsed().as_millis() as u64).max(1)
}
