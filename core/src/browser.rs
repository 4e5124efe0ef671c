//! DNS-SD browsing for SSH service advertisements.
//!
//! Watches the local administrative domain for `_ssh._tcp` and
//! `_sftp-ssh._tcp` announcements and reports each one as a host
//! candidate. An advertisement that never resolves to an address within
//! its deadline still surfaces under a sanitized fallback name — partial
//! information beats none for a user-confirmed prefill.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use scoutr_common::cancel::CancelToken;
use scoutr_common::config::ScanConfig;
use scoutr_common::event::{DiscoveryEvent, DiscoverySource, SourceStatus};
use scoutr_common::network::host::DiscoveredHost;

/// Service types that advertise an SSH-capable endpoint.
pub const SSH_SERVICE_TYPES: [&str; 2] = ["_ssh._tcp.local.", "_sftp-ssh._tcp.local."];

/// How often pending advertisements are swept against their resolution
/// deadline.
const PENDING_SWEEP_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum BrowseError {
    /// The platform refused local-network browsing outright.
    #[error("local network browsing not permitted: {0}")]
    PermissionDenied(String),
    #[error("service browsing failed: {0}")]
    Daemon(String),
}

impl From<mdns_sd::Error> for BrowseError {
    fn from(err: mdns_sd::Error) -> Self {
        let message = err.to_string();
        if is_permission_message(&message) {
            BrowseError::PermissionDenied(message)
        } else {
            BrowseError::Daemon(message)
        }
    }
}

fn is_permission_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("permission denied") || lowered.contains("not permitted")
}

/// Passive discovery source: pushes advertisement-derived host candidates
/// into the session's event sink.
#[async_trait]
pub trait ServiceBrowser: Send + Sync {
    /// Browses until `cancel` fires.
    ///
    /// The started status must be emitted immediately. The finished status
    /// is never emitted here: advertisements have no natural end, so the
    /// session decides when this source is done.
    async fn browse(
        &self,
        config: ScanConfig,
        events: UnboundedSender<DiscoveryEvent>,
        cancel: CancelToken,
    );
}

/// An advertisement seen but not yet resolved to an address.
struct PendingAd {
    instance: String,
    deadline: Instant,
}

/// Browser backed by an `mdns-sd` daemon.
pub struct MdnsServiceBrowser;

#[async_trait]
impl ServiceBrowser for MdnsServiceBrowser {
    async fn browse(
        &self,
        config: ScanConfig,
        events: UnboundedSender<DiscoveryEvent>,
        cancel: CancelToken,
    ) {
        let _ = events.send(DiscoveryEvent::SourceStatus {
            source: DiscoverySource::ServiceDiscovery,
            status: SourceStatus::Started,
        });

        if let Err(err) = run_browse(&config, &events, &cancel).await {
            match err {
                BrowseError::PermissionDenied(message) => {
                    warn!(%message, "service browsing denied");
                    let _ = events.send(DiscoveryEvent::PermissionDenied);
                }
                BrowseError::Daemon(message) => {
                    warn!(%message, "service browsing unavailable");
                    let _ = events.send(DiscoveryEvent::Failed { message });
                }
            }
        }
    }
}

async fn run_browse(
    config: &ScanConfig,
    events: &UnboundedSender<DiscoveryEvent>,
    cancel: &CancelToken,
) -> Result<(), BrowseError> {
    let daemon = ServiceDaemon::new()?;
    let ssh_rx = daemon.browse(SSH_SERVICE_TYPES[0])?;
    let sftp_rx = daemon.browse(SSH_SERVICE_TYPES[1])?;
    debug!("browsing for SSH service advertisements");

    let mut seen: HashSet<String> = HashSet::new();
    let mut pending: HashMap<String, PendingAd> = HashMap::new();
    let mut sweep = tokio::time::interval(PENDING_SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = ssh_rx.recv_async() => match event {
                Ok(event) => {
                    handle_event(event, SSH_SERVICE_TYPES[0], config, events, &mut seen, &mut pending)
                }
                Err(_) => break,
            },
            event = sftp_rx.recv_async() => match event {
                Ok(event) => {
                    handle_event(event, SSH_SERVICE_TYPES[1], config, events, &mut seen, &mut pending)
                }
                Err(_) => break,
            },
            _ = sweep.tick() => flush_expired(events, &mut seen, &mut pending, config.ssh_port),
        }
    }

    let _ = daemon.shutdown();
    Ok(())
}

fn handle_event(
    event: ServiceEvent,
    ty: &str,
    config: &ScanConfig,
    events: &UnboundedSender<DiscoveryEvent>,
    seen: &mut HashSet<String>,
    pending: &mut HashMap<String, PendingAd>,
) {
    match event {
        ServiceEvent::ServiceFound(_, fullname) => {
            let key = ad_key(ty, &fullname);
            if seen.contains(&key) || pending.contains_key(&key) {
                return;
            }
            debug!(%fullname, %ty, "advertisement found, awaiting resolution");
            pending.insert(
                key,
                PendingAd {
                    instance: instance_name(&fullname, ty),
                    deadline: Instant::now() + config.resolve_timeout,
                },
            );
        }
        ServiceEvent::ServiceResolved(info) => {
            let key = ad_key(ty, info.get_fullname());
            pending.remove(&key);
            if !seen.insert(key) {
                return;
            }

            let instance = instance_name(info.get_fullname(), ty);
            let hostname = info.get_hostname().trim_end_matches('.').to_string();
            let host = if hostname.is_empty() {
                fallback_host(&instance)
            } else {
                hostname
            };
            let port = match info.get_port() {
                0 => config.ssh_port,
                port => port,
            };

            debug!(%instance, %host, port, "advertisement resolved");
            let _ = events.send(DiscoveryEvent::HostFound(DiscoveredHost::from_service(
                instance, host, port,
            )));
        }
        _ => {}
    }
}

/// Advertisements that missed their resolution deadline degrade to a
/// fallback-named entry instead of disappearing.
fn flush_expired(
    events: &UnboundedSender<DiscoveryEvent>,
    seen: &mut HashSet<String>,
    pending: &mut HashMap<String, PendingAd>,
    default_port: u16,
) {
    let now = Instant::now();
    let expired: Vec<String> = pending
        .iter()
        .filter(|(_, ad)| ad.deadline <= now)
        .map(|(key, _)| key.clone())
        .collect();

    for key in expired {
        let Some(ad) = pending.remove(&key) else {
            continue;
        };
        seen.insert(key);

        let host = fallback_host(&ad.instance);
        debug!(instance = %ad.instance, %host, "resolution timed out, using fallback name");
        let _ = events.send(DiscoveryEvent::HostFound(DiscoveredHost::from_service(
            ad.instance,
            host,
            default_port,
        )));
    }
}

/// Composite dedup key so the same advertisement is never resolved twice.
fn ad_key(ty: &str, fullname: &str) -> String {
    format!("{fullname}|{ty}")
}

/// Strips the service-type suffix from a full advertisement name.
fn instance_name(fullname: &str, ty: &str) -> String {
    fullname
        .strip_suffix(ty)
        .map(|instance| instance.trim_end_matches('.'))
        .unwrap_or(fullname)
        .to_string()
}

/// `"Living Room Pi"` → `"living-room-pi.local"`.
fn fallback_host(instance: &str) -> String {
    format!("{}.local", sanitize(instance))
}

/// Lowercases, collapses whitespace runs into hyphens, and drops anything
/// outside `[a-z0-9.-]`. Heuristic only — the result just has to be a
/// plausible thing to put in a host field.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_hyphen = false;

    for ch in name.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_whitespace() {
            if !last_was_hyphen && !out.is_empty() {
                out.push('-');
                last_was_hyphen = true;
            }
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' {
            out.push(ch);
            last_was_hyphen = ch == '-';
        }
    }

    out.trim_end_matches('-').to_string()
}
