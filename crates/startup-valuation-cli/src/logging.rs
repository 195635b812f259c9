use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "startup_valuation_core=warn";

/// Install the stderr subscriber so stdout stays machine-readable.
/// `RUST_LOG` replaces the default filter when set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
