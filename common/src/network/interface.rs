//! Interface qualification and selection.
//!
//! A scan session probes exactly one interface. This module decides which
//! one: every interface is checked for basic viability, and among the
//! survivors a wireless/primary-looking name wins, otherwise the last one
//! that qualified.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use thiserror::Error;
use tracing::debug;

/// Name prefixes that look like the wireless/primary interface. The `wl`
/// family covers Linux; `en` covers macOS, where `en0` is the built-in
/// Wi-Fi on laptops.
const PREFERRED_NAME_PREFIXES: &[&str] = &["wlan", "wlp", "wl", "en", "wifi"];

/// Why an interface was rejected for scanning.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("interface is down")]
    Down,
    #[error("loopback interface")]
    Loopback,
    #[error("no IPv4 address with a netmask")]
    NoIpv4,
}

/// The link a session scans from: the device's own address plus netmask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanLink {
    pub name: String,
    pub addr: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

/// Read-only snapshot of the OS interface table.
pub trait InterfaceProvider: Send + Sync {
    fn interfaces(&self) -> Vec<NetworkInterface>;
}

/// Live snapshot via the OS.
pub struct SystemInterfaces;

impl InterfaceProvider for SystemInterfaces {
    fn interfaces(&self) -> Vec<NetworkInterface> {
        datalink::interfaces()
    }
}

/// Checks a single interface and extracts its IPv4 link data.
pub fn qualify(interface: &NetworkInterface) -> Result<LanLink, RejectReason> {
    if !interface.is_up() {
        return Err(RejectReason::Down);
    }
    if interface.is_loopback() {
        return Err(RejectReason::Loopback);
    }

    let v4 = interface
        .ips
        .iter()
        .find_map(|net| match net {
            IpNetwork::V4(v4) => Some(*v4),
            IpNetwork::V6(_) => None,
        })
        .ok_or(RejectReason::NoIpv4)?;

    Ok(LanLink {
        name: interface.name.clone(),
        addr: v4.ip(),
        netmask: v4.mask(),
    })
}

/// Picks the link to scan from a snapshot.
///
/// First qualifying interface whose name looks wireless/primary, else the
/// last interface that qualifies at all. `None` when nothing qualifies —
/// the caller probes nothing rather than guessing.
pub fn select_scan_link(interfaces: &[NetworkInterface]) -> Option<LanLink> {
    let qualified: Vec<LanLink> = interfaces
        .iter()
        .filter_map(|interface| qualify(interface).ok())
        .collect();

    let link = qualified
        .iter()
        .find(|link| looks_primary(&link.name))
        .or_else(|| qualified.last())
        .cloned();

    if let Some(ref link) = link {
        debug!(interface = %link.name, addr = %link.addr, "selected scan interface");
    }
    link
}

fn looks_primary(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    PREFERRED_NAME_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
