//! Structured logging with `tracing`.
//!
//! Thread resolution and autocomplete log through `tracing` macros; hosts
//! call [`init_subscriber`] once at startup. Tests use [`capture_logs`] to
//! assert on emitted events without installing a global subscriber.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// # Arguments
///
/// * `level` - Minimum log level to display, e.g. `"warn"` or `"strand_thread=debug"`.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already installed
    let _ = subscriber.try_init();
}
