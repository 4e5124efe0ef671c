use std::time::Duration;

/// TCP connect budget for a single probe.
///
/// Trades completeness for total scan latency: a host slower than this is
/// missed. Tunable here, not user-configurable.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(350);

/// Maximum concurrent connect attempts per probe wave.
pub const PROBE_CONCURRENCY: usize = 24;

/// Budget for resolving one service advertisement to an address.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Hard upper bound on a scan session, independent of how many candidates
/// remain unprobed.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(6);

/// Port probed on every candidate, and the fallback for advertisements
/// that report none.
pub const SSH_PORT: u16 = 22;

/// Bounds for one discovery session.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub ssh_port: u16,
    pub probe_timeout: Duration,
    pub probe_concurrency: usize,
    pub resolve_timeout: Duration,
    pub session_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ssh_port: SSH_PORT,
            probe_timeout: PROBE_TIMEOUT,
            probe_concurrency: PROBE_CONCURRENCY,
            resolve_timeout: RESOLVE_TIMEOUT,
            session_timeout: SESSION_TIMEOUT,
        }
    }
}
