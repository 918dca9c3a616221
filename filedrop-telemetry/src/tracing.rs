//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Filter directive applied when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

// Tests across one binary share a process; only the first call may install
// the global subscriber.
static TEST_TRACING: Once = Once::new();

/// Initializes tracing for a service binary.
///
/// Respects `RUST_LOG`, defaulting to `info`, and emits an initial event
/// naming the service so logs from different binaries are tellable apart.
pub fn init_tracing(service_name: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_target(false)
        .init();

    ::tracing::info!(service = service_name, "tracing initialized");
}

/// Initializes tracing for tests.
///
/// Safe to call at the top of every test; the subscriber is installed once
/// and routed through the test writer so output attaches to the right test.
pub fn init_test_tracing() {
    TEST_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(default_filter())
            .with_test_writer()
            .init();
    });
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
