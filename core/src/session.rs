//! Scan session lifecycle and event-stream orchestration.
//!
//! One controller owns at most one live session. Starting a scan while one
//! is running tears the old session down completely first — sessions are
//! never concurrent, and a stopped session's tasks can never emit into a
//! newer session's stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use scoutr_common::cancel::CancelToken;
use scoutr_common::config::ScanConfig;
use scoutr_common::event::{DiscoveryEvent, DiscoverySource, SourceStatus};
use scoutr_common::network::interface::{InterfaceProvider, SystemInterfaces, select_scan_link};
use scoutr_common::network::subnet;

use crate::browser::{MdnsServiceBrowser, ServiceBrowser};
use crate::probe::{TcpProber, TokioProber};
use crate::scheduler::ProbeScheduler;

/// Where the controller currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Finished,
}

/// Orchestrates one discovery session at a time: both sources, the shared
/// event stream, the session deadline, and teardown.
pub struct DiscoveryController {
    prober: Arc<dyn TcpProber>,
    browser: Arc<dyn ServiceBrowser>,
    interfaces: Arc<dyn InterfaceProvider>,
    config: ScanConfig,
    session: Option<ScanSession>,
}

/// Everything a running scan owns. Dropping the handles is not enough for
/// teardown; [`ScanSession::shutdown`] cancels and then awaits each task so
/// no socket or browse handle outlives the session.
struct ScanSession {
    cancel: CancelToken,
    driver: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl ScanSession {
    async fn shutdown(self) {
        self.cancel.cancel();
        for worker in self.workers {
            let _ = worker.await;
        }
        let _ = self.driver.await;
    }
}

impl DiscoveryController {
    /// Controller wired to the real network: tokio connects, `mdns-sd`
    /// browsing, and a live OS interface snapshot.
    pub fn new(config: ScanConfig) -> Self {
        Self::with_adapters(
            Arc::new(TokioProber),
            Arc::new(MdnsServiceBrowser),
            Arc::new(SystemInterfaces),
            config,
        )
    }

    /// Controller with injected source adapters — the seam the tests use.
    pub fn with_adapters(
        prober: Arc<dyn TcpProber>,
        browser: Arc<dyn ServiceBrowser>,
        interfaces: Arc<dyn InterfaceProvider>,
        config: ScanConfig,
    ) -> Self {
        Self {
            prober,
            browser,
            interfaces,
            config,
            session: None,
        }
    }

    pub fn state(&self) -> ScanState {
        match &self.session {
            None => ScanState::Idle,
            Some(session) if session.driver.is_finished() => ScanState::Finished,
            Some(_) => ScanState::Scanning,
        }
    }

    /// Starts a scan session and hands back its live event stream.
    ///
    /// A previous session is fully torn down first. Never fails: every
    /// problem after this point travels through the stream as events.
    pub async fn start_scan(&mut self) -> UnboundedReceiver<DiscoveryEvent> {
        self.stop_scan().await;

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (source_tx, source_rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();

        let _ = out_tx.send(DiscoveryEvent::ScanningStarted);

        let browser_task = {
            let browser = Arc::clone(&self.browser);
            let config = self.config.clone();
            let events = source_tx.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { browser.browse(config, events, cancel).await })
        };

        let probe_task = {
            let prober = Arc::clone(&self.prober);
            let interfaces = Arc::clone(&self.interfaces);
            let config = self.config.clone();
            let events = source_tx;
            let cancel = cancel.clone();
            tokio::spawn(async move {
                // Fail closed: no qualifying interface means zero active
                // probes, not an error.
                let snapshot = interfaces.interfaces();
                let targets = select_scan_link(&snapshot)
                    .map(|link| subnet::enumerate(&link).targets)
                    .unwrap_or_default();
                ProbeScheduler::new(prober, config)
                    .run(targets, events, cancel)
                    .await;
            })
        };

        let driver = tokio::spawn(drive(
            source_rx,
            out_tx,
            cancel.clone(),
            self.config.session_timeout,
        ));

        self.session = Some(ScanSession {
            cancel,
            driver,
            workers: vec![browser_task, probe_task],
        });
        out_rx
    }

    /// Cancels the active session and waits for every task it owned.
    /// A no-op when nothing is running.
    pub async fn stop_scan(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("stopping scan session");
            session.shutdown().await;
        }
    }

    /// Convenience: tear the current session down and start a fresh one.
    pub async fn rescan(&mut self) -> UnboundedReceiver<DiscoveryEvent> {
        self.start_scan().await
    }
}

/// The single writer of the outgoing stream.
///
/// Forwards source events until the session deadline fires, the session is
/// stopped, or both sources hang up. It then closes the session out:
/// cancels remaining work, synthesizes the finished status for any source
/// that has not reported one, and emits `ScanningFinished` exactly once.
/// Nothing can emit afterwards because nothing else holds the outgoing
/// sender.
async fn drive(
    mut sources: UnboundedReceiver<DiscoveryEvent>,
    out: UnboundedSender<DiscoveryEvent>,
    cancel: CancelToken,
    session_timeout: Duration,
) {
    let deadline = tokio::time::sleep(session_timeout);
    tokio::pin!(deadline);

    let mut finished: Vec<DiscoverySource> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = &mut deadline => {
                debug!("session deadline reached");
                break;
            }
            event = sources.recv() => match event {
                Some(event) => {
                    if let DiscoveryEvent::SourceStatus {
                        source,
                        status: SourceStatus::Finished,
                    } = &event
                    {
                        finished.push(*source);
                    }
                    if out.send(event).is_err() {
                        // Consumer dropped the stream; treat as a stop.
                        break;
                    }
                }
                None => break,
            },
        }
    }

    cancel.cancel();

    for source in [DiscoverySource::ServiceDiscovery, DiscoverySource::ActiveProbe] {
        if !finished.contains(&source) {
            let _ = out.send(DiscoveryEvent::SourceStatus {
                source,
                status: SourceStatus::Finished,
            });
        }
    }
    let _ = out.send(DiscoveryEvent::ScanningFinished);
}
