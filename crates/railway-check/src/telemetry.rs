use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset. Failed checks are already part of
/// the report, so only errors reach stderr by default.
pub const DEFAULT_FILTER: &str = "railway_check=error,railway_api=error";

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// the report.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
