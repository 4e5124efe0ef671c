//! Wave-based scheduling of reachability probes.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::debug;

use scoutr_common::cancel::CancelToken;
use scoutr_common::config::ScanConfig;
use scoutr_common::event::{DiscoveryEvent, DiscoverySource, SourceStatus};
use scoutr_common::network::host::DiscoveredHost;

use crate::probe::TcpProber;

/// Fans the candidate list out to the prober in waves, never holding more
/// than `probe_concurrency` connects in flight.
pub struct ProbeScheduler {
    prober: Arc<dyn TcpProber>,
    config: ScanConfig,
}

impl ProbeScheduler {
    pub fn new(prober: Arc<dyn TcpProber>, config: ScanConfig) -> Self {
        Self { prober, config }
    }

    /// Probes every candidate, emitting a [`DiscoveryEvent::HostFound`] the
    /// moment a probe succeeds. The next wave starts as soon as the
    /// previous one has fully completed.
    ///
    /// The cancellation token is checked between waves; a cancel while a
    /// wave is in flight aborts its remaining probe tasks, so no socket
    /// outlives the session. The finished status is emitted exactly once
    /// and only on natural completion — after an abort the session driver
    /// synthesizes it instead.
    pub async fn run(
        &self,
        targets: Vec<Ipv4Addr>,
        events: UnboundedSender<DiscoveryEvent>,
        cancel: CancelToken,
    ) {
        let _ = events.send(DiscoveryEvent::SourceStatus {
            source: DiscoverySource::ActiveProbe,
            status: SourceStatus::Started,
        });

        let cap = self.config.probe_concurrency.max(1);
        debug!(candidates = targets.len(), cap, "starting probe waves");

        for wave in targets.chunks(cap) {
            if cancel.is_cancelled() {
                return;
            }
            if !self.run_wave(wave, &events, &cancel).await {
                return;
            }
        }

        debug!("probe phase finished");
        let _ = events.send(DiscoveryEvent::SourceStatus {
            source: DiscoverySource::ActiveProbe,
            status: SourceStatus::Finished,
        });
    }

    /// Runs one wave to completion. Returns false when cancelled mid-wave.
    async fn run_wave(
        &self,
        wave: &[Ipv4Addr],
        events: &UnboundedSender<DiscoveryEvent>,
        cancel: &CancelToken,
    ) -> bool {
        let port = self.config.ssh_port;
        let mut inflight: JoinSet<(Ipv4Addr, Option<u64>)> = JoinSet::new();

        for &ip in wave {
            let prober = Arc::clone(&self.prober);
            let limit = self.config.probe_timeout;
            inflight.spawn(async move {
                let addr = SocketAddr::new(IpAddr::V4(ip), port);
                (ip, prober.probe(addr, limit).await)
            });
        }

        loop {
            tokio::select! {
                joined = inflight.join_next() => match joined {
                    None => return true,
                    Some(Ok((ip, Some(latency_ms)))) => {
                        let host = DiscoveredHost::from_probe(ip, port, latency_ms);
                        let _ = events.send(DiscoveryEvent::HostFound(host));
                    }
                    Some(_) => {}
                },
                _ = cancel.cancelled() => {
                    inflight.abort_all();
                    return false;
                }
            }
        }
    }
}
