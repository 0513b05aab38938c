use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. Silent unless `RUST_LOG` asks for output,
/// since the dashboard owns the terminal while it runs.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .try_init();
}
