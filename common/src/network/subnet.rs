//! Bounded candidate enumeration for active probing.
//!
//! Works entirely in `u32` address space: network/broadcast boundaries from
//! the netmask, all hosts strictly between them, minus the device itself.
//! Subnets wider than /24 are never swept in full.

use std::net::Ipv4Addr;

use super::interface::LanLink;

/// Boundary above which the subnet is scanned as-is. Anything wider gets
/// clamped to the /24 slice containing the device's own address, which
/// caps a scan at 254 sockets no matter how large the real segment is.
const CLAMP_PREFIX: u32 = 24;
const CLAMP_MASK: u32 = 0xFFFF_FF00;

/// The probe targets computed once per scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    /// The device's own address, excluded from `targets`.
    pub local_addr: Ipv4Addr,
    pub targets: Vec<Ipv4Addr>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Prefix length of a netmask, by population count.
pub fn prefix_len(netmask: Ipv4Addr) -> u32 {
    u32::from(netmask).count_ones()
}

/// Computes the bounded probe-target list for a link.
///
/// Fails closed: a degenerate range (/31, /32, or a mask that collapses to
/// one) yields an empty set, not an error.
pub fn enumerate(link: &LanLink) -> CandidateSet {
    let addr = u32::from(link.addr);

    let (network, broadcast) = if prefix_len(link.netmask) < CLAMP_PREFIX {
        let network = addr & CLAMP_MASK;
        (network, network | !CLAMP_MASK)
    } else {
        let mask = u32::from(link.netmask);
        let network = addr & mask;
        (network, network | !mask)
    };

    if broadcast <= network.saturating_add(1) {
        return CandidateSet {
            network: Ipv4Addr::from(network),
            broadcast: Ipv4Addr::from(broadcast),
            local_addr: link.addr,
            targets: Vec::new(),
        };
    }

    let targets = (network + 1..broadcast)
        .filter(|&candidate| candidate != addr)
        .map(Ipv4Addr::from)
        .collect();

    CandidateSet {
        network: Ipv4Addr::from(network),
        broadcast: Ipv4Addr::from(broadcast),
        local_addr: link.addr,
        targets,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
