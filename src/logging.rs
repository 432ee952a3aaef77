// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber, level from the environment.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the log subscriber.
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=jobtrack_importer=trace
///
/// # Example
/// ```no_run
/// use jobtrack_importer::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Subscriber for tests: more verbose, writer captured per test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
