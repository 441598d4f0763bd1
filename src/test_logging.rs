//! Opt-in logging wiring for tests.
//!
//! Installs a `tracing` subscriber that writes through the test harness so
//! combinator diagnostics (emitted under the `tracing-integration` feature)
//! show up interleaved with test output. Filtering follows `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the test subscriber once per process; later calls are no-ops.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
