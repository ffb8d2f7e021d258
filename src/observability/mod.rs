//! Observability for the filter service
//!
//! Structured logging only:
//! - One JSON object per line, on stderr so stdout stays free for CLI output
//! - Level filter from `RUST_LOG`, defaulting to [`DEFAULT_FILTER`]
//!
//! # Usage
//!
//! ```ignore
//! search_filter::observability::init_logging();
//! tracing::info!(filter_id = %id, "filter created");
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Build the level filter from `RUST_LOG`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global JSON subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
