use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install structured logging with environment-based filtering.
///
/// Defaults to `info,reship_core=debug`; override with `RUST_LOG`,
/// e.g. `RUST_LOG=reship_core=trace`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reship_core=debug"));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}
