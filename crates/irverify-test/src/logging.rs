//! Log output for test runs.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: recorded failures and contract
/// violations only.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a test-friendly `tracing` subscriber.
///
/// Output goes through the test writer so it is captured per test. Safe to
/// call from every test; only the first call in a process installs anything.
/// Returns true if this call installed the subscriber.
pub fn init_test_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
