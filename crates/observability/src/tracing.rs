//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// Reads `RUST_LOG` for the filter; without it, the gateway logs at debug
/// and everything else at info. Safe to call multiple times (subsequent
/// calls are no-ops), which lets integration tests share one process.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eduhub_gateway=debug"));

    // JSON lines on stdout, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .with_current_span(false)
        .try_init();
}
