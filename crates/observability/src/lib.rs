//! Tracing/logging setup shared by the gateway binary and its tests.

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filter, formatter).
pub mod tracing;
