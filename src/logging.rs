//! Diagnostic logging
//!
//! Result lines go to stdout; diagnostics go to stderr through `tracing`,
//! filtered by `RUST_LOG`.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{fmt, prelude::*};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "zlibwapi_test=warn";

/// Install the global subscriber
///
/// Calling it again after a subscriber is installed has no effect.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
