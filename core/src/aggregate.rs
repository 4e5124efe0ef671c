//! Folding the event stream into a presentable host list.

use std::collections::HashMap;

use scoutr_common::event::DiscoveryEvent;
use scoutr_common::network::host::DiscoveredHost;

/// Merges `HostFound` events by identity key into a stable, deduplicated
/// result set.
///
/// Merging is commutative with respect to arrival order: for a given set
/// of observations the final list is the same however the two sources
/// happened to interleave.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    hosts: HashMap<String, DiscoveredHost>,
    permission_denied: bool,
    failures: Vec<String>,
    finished: bool,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the aggregate.
    pub fn apply(&mut self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::HostFound(host) => {
                self.hosts
                    .entry(host.identity_key())
                    .and_modify(|existing| existing.absorb(host))
                    .or_insert_with(|| host.clone());
            }
            DiscoveryEvent::PermissionDenied => self.permission_denied = true,
            DiscoveryEvent::Failed { message } => self.failures.push(message.clone()),
            DiscoveryEvent::ScanningFinished => self.finished = true,
            _ => {}
        }
    }

    /// Snapshot of the merged hosts, ordered by identity key.
    pub fn hosts(&self) -> Vec<DiscoveredHost> {
        let mut keyed: Vec<(&String, &DiscoveredHost)> = self.hosts.iter().collect();
        keyed.sort_by(|a, b| a.0.cmp(b.0));
        keyed.into_iter().map(|(_, host)| host.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Whether the platform denied local-network browsing this session.
    /// Distinguishes "nothing out there" from "we were not allowed to look".
    pub fn permission_denied(&self) -> bool {
        self.permission_denied
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
