use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the tracing subscriber. Logs go to stderr so that report
/// output on stdout is unaffected; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
