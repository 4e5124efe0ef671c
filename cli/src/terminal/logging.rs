use tracing_subscriber::EnvFilter;

/// Installs the tracing subscriber for the process. `RUST_LOG` wins over
/// the `--verbose` flag when both are present.
pub fn init(verbose: bool) {
    let fallback = if verbose { "scoutr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
