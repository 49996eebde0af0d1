//! Structured logging configuration.
//!
//! Provides setup for observability using the `tracing` crate with:
//! - Structured logging with JSON output option
//! - Configurable log levels, overridable through `RUST_LOG`

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer as _, Registry,
};

/// Initialize tracing with the given level and output format.
///
/// Logs go to stderr so stdout stays free for the events log.
///
/// # Panics
///
/// Panics if tracing subscriber has already been initialized in this process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let output = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);
    // Same fields either way; only the encoding differs.
    let output = if json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    Registry::default().with(env_filter).with(output).init();

    tracing::debug!(level, json, "Tracing initialized");
}
