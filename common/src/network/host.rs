use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Instant;

use crate::event::DiscoverySource;

/// One candidate SSH endpoint, as presented to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredHost {
    /// Service instance name, resolved hostname, or the bare address.
    pub display_name: String,
    /// Hostname or literal IPv4 address to connect to.
    pub host: String,
    pub port: u16,
    /// Every source that has observed this endpoint. Unioned on merge,
    /// never overwritten.
    pub sources: BTreeSet<DiscoverySource>,
    /// Measured round-trip of a successful probe, if one happened.
    pub latency_ms: Option<u64>,
    /// Refreshed on every re-observation.
    pub last_seen: Instant,
}

impl DiscoveredHost {
    /// Endpoint confirmed by an active TCP probe.
    pub fn from_probe(addr: Ipv4Addr, port: u16, latency_ms: u64) -> Self {
        let host = addr.to_string();
        Self {
            display_name: host.clone(),
            host,
            port,
            sources: BTreeSet::from([DiscoverySource::ActiveProbe]),
            latency_ms: Some(latency_ms),
            last_seen: Instant::now(),
        }
    }

    /// Endpoint announced by a service advertisement.
    pub fn from_service(
        display_name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            host: host.into(),
            port,
            sources: BTreeSet::from([DiscoverySource::ServiceDiscovery]),
            latency_ms: None,
            last_seen: Instant::now(),
        }
    }

    /// Dedup key. Lowercased so `Pi.local` and `pi.local` collapse.
    pub fn identity_key(&self) -> String {
        format!("{}:{}", self.host.to_lowercase(), self.port)
    }

    /// Whether the name says more than the bare address does.
    pub fn has_descriptive_name(&self) -> bool {
        !self.display_name.is_empty() && self.display_name != self.host
    }

    /// Folds a re-observation of the same endpoint into this record.
    ///
    /// Source sets union, the newer observation wins the mutable fields,
    /// and a bare-address fallback name never displaces a descriptive one.
    /// The outcome does not depend on which of two observations arrived
    /// first.
    pub fn absorb(&mut self, other: &DiscoveredHost) {
        self.sources.extend(other.sources.iter().copied());

        let newer = other.last_seen >= self.last_seen;
        if other.has_descriptive_name() && (newer || !self.has_descriptive_name()) {
            self.display_name = other.display_name.clone();
        }
        if let Some(ms) = other.latency_ms {
            if newer || self.latency_ms.is_none() {
                self.latency_ms = Some(ms);
            }
        }
        if newer {
            self.last_seen = other.last_seen;
        }
    }
}
