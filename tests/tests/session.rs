//! Session-level behavior: lifecycle events, timeout termination,
//! exclusivity across rescans, and failure surfacing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use scoutr_common::config::ScanConfig;
use scoutr_common::event::{DiscoveryEvent, DiscoverySource, SourceStatus};
use scoutr_common::network::host::DiscoveredHost;
use scoutr_core::{DiscoveryController, ResultAggregator, ScanState};
use scoutr_integration_tests::fixtures::{eth1_down, lo, wlan0};
use scoutr_integration_tests::mocks::{FixedInterfaces, MockProber, ScriptedBrowser, drain};

fn fast_config() -> ScanConfig {
    ScanConfig {
        session_timeout: Duration::from_millis(300),
        probe_timeout: Duration::from_millis(50),
        ..ScanConfig::default()
    }
}

fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

fn count_finished(events: &[DiscoveryEvent], wanted: DiscoverySource) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                DiscoveryEvent::SourceStatus { source, status: SourceStatus::Finished }
                    if *source == wanted
            )
        })
        .count()
}

fn count_scanning_finished(events: &[DiscoveryEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, DiscoveryEvent::ScanningFinished))
        .count()
}

#[tokio::test]
async fn timeout_terminates_an_idle_session() {
    // Degenerate interface state: nothing qualifies, so zero probes; the
    // browser never finds anything. The deadline still closes the session
    // out cleanly.
    let mut controller = DiscoveryController::with_adapters(
        Arc::new(MockProber::new([])),
        Arc::new(ScriptedBrowser::quiet()),
        Arc::new(FixedInterfaces(vec![lo(), eth1_down()])),
        fast_config(),
    );

    let events = drain(controller.start_scan().await).await;

    assert_eq!(events.first(), Some(&DiscoveryEvent::ScanningStarted));
    assert_eq!(events.last(), Some(&DiscoveryEvent::ScanningFinished));
    assert_eq!(count_scanning_finished(&events), 1);
    assert_eq!(count_finished(&events, DiscoverySource::ActiveProbe), 1);
    assert_eq!(count_finished(&events, DiscoverySource::ServiceDiscovery), 1);
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, DiscoveryEvent::HostFound(_))),
        "an empty segment must produce no hosts"
    );

    controller.stop_scan().await;
    assert_eq!(controller.state(), ScanState::Idle);
}

#[tokio::test]
async fn probe_sweep_finds_the_open_endpoint() {
    // wlan0 sits at 192.168.1.42/24, giving 253 candidates, and exactly
    // one of them accepts on port 22.
    let prober = Arc::new(MockProber::new([addr("192.168.1.1:22")]).with_latency(40));
    let mut controller = DiscoveryController::with_adapters(
        Arc::clone(&prober) as Arc<dyn scoutr_core::probe::TcpProber>,
        Arc::new(ScriptedBrowser::quiet()),
        Arc::new(FixedInterfaces(vec![lo(), wlan0()])),
        fast_config(),
    );

    let events = drain(controller.start_scan().await).await;

    let mut results = ResultAggregator::new();
    for event in &events {
        results.apply(event);
    }

    assert_eq!(prober.completed(), 253, "every candidate gets probed once");

    let hosts = results.hosts();
    assert_eq!(hosts.len(), 1);
    let host = &hosts[0];
    assert_eq!(host.host, "192.168.1.1");
    assert_eq!(host.port, 22);
    assert_eq!(host.latency_ms, Some(40));
    assert!(host.sources.contains(&DiscoverySource::ActiveProbe));
    assert!(!host.sources.contains(&DiscoverySource::ServiceDiscovery));
}

#[tokio::test]
async fn advertisement_and_probe_merge_into_one_record() {
    // The same endpoint seen by both sources collapses to one record that
    // keeps the descriptive name and the measured latency.
    let advertised = DiscoveredHost::from_service("raspberrypi", "192.168.1.1", 22);
    let browser = ScriptedBrowser::new(vec![(
        Duration::from_millis(10),
        DiscoveryEvent::HostFound(advertised),
    )]);
    let prober = Arc::new(MockProber::new([addr("192.168.1.1:22")]).with_latency(40));

    let mut controller = DiscoveryController::with_adapters(
        Arc::clone(&prober) as Arc<dyn scoutr_core::probe::TcpProber>,
        Arc::new(browser),
        Arc::new(FixedInterfaces(vec![wlan0()])),
        fast_config(),
    );

    let events = drain(controller.start_scan().await).await;

    let mut results = ResultAggregator::new();
    for event in &events {
        results.apply(event);
    }

    let hosts = results.hosts();
    assert_eq!(hosts.len(), 1);
    let host = &hosts[0];
    assert_eq!(host.display_name, "raspberrypi");
    assert_eq!(host.latency_ms, Some(40));
    assert!(host.sources.contains(&DiscoverySource::ServiceDiscovery));
    assert!(host.sources.contains(&DiscoverySource::ActiveProbe));
}

#[tokio::test]
async fn rescan_supersedes_the_previous_session() {
    // A long-running session gets superseded; its stream must close with a
    // terminal event and never leak into the new session's stream.
    let slow_browser = ScriptedBrowser::new(vec![(
        Duration::from_millis(10),
        DiscoveryEvent::HostFound(DiscoveredHost::from_service("pi", "pi.local", 22)),
    )]);
    let config = ScanConfig {
        session_timeout: Duration::from_secs(10),
        ..ScanConfig::default()
    };
    let mut controller = DiscoveryController::with_adapters(
        Arc::new(MockProber::new([])),
        Arc::new(slow_browser),
        Arc::new(FixedInterfaces(vec![])),
        config,
    );

    let first_rx = controller.start_scan().await;
    assert_eq!(controller.state(), ScanState::Scanning);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut second_rx = controller.rescan().await;

    // The first stream is already closed: drain returns without waiting
    // for the 10s deadline, and ends on its terminal event.
    let first_events =
        tokio::time::timeout(Duration::from_secs(1), drain(first_rx))
            .await
            .expect("superseded stream must close immediately");
    assert_eq!(first_events.last(), Some(&DiscoveryEvent::ScanningFinished));
    assert_eq!(count_scanning_finished(&first_events), 1);

    let first_of_second = second_rx.recv().await;
    assert_eq!(first_of_second, Some(DiscoveryEvent::ScanningStarted));

    controller.stop_scan().await;
    assert_eq!(controller.state(), ScanState::Idle);
}

#[tokio::test]
async fn stop_scan_is_idempotent() {
    let mut controller = DiscoveryController::with_adapters(
        Arc::new(MockProber::new([])),
        Arc::new(ScriptedBrowser::quiet()),
        Arc::new(FixedInterfaces(vec![])),
        fast_config(),
    );

    // Stopping with nothing running is a no-op.
    controller.stop_scan().await;
    controller.stop_scan().await;
    assert_eq!(controller.state(), ScanState::Idle);

    let rx = controller.start_scan().await;
    controller.stop_scan().await;
    controller.stop_scan().await;
    assert_eq!(controller.state(), ScanState::Idle);

    let events = drain(rx).await;
    assert_eq!(count_scanning_finished(&events), 1);
}

#[tokio::test]
async fn permission_denial_is_informational_not_fatal() {
    // The browser gets denied, the probe path keeps going and still finds
    // its endpoint.
    let denied_browser =
        ScriptedBrowser::new(vec![(Duration::ZERO, DiscoveryEvent::PermissionDenied)]);
    let prober = Arc::new(MockProber::new([addr("192.168.1.1:22")]));

    let mut controller = DiscoveryController::with_adapters(
        Arc::clone(&prober) as Arc<dyn scoutr_core::probe::TcpProber>,
        Arc::new(denied_browser),
        Arc::new(FixedInterfaces(vec![wlan0()])),
        fast_config(),
    );

    let events = drain(controller.start_scan().await).await;

    let denials = events
        .iter()
        .filter(|event| matches!(event, DiscoveryEvent::PermissionDenied))
        .count();
    assert_eq!(denials, 1);

    let mut results = ResultAggregator::new();
    for event in &events {
        results.apply(event);
    }
    assert!(results.permission_denied());
    assert_eq!(results.len(), 1, "probing continues despite the denial");
    assert_eq!(count_scanning_finished(&events), 1);
}
