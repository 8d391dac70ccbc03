use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset: our own crate plus request
/// traces from tower-http at info.
const DEFAULT_FILTER: &str = "info,remedi_backend=info,tower_http=info";

/// Initialize structured logging for the service.
///
/// Call once at startup, before the config is loaded, so config failures
/// are logged too.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Logging initialized");
}
