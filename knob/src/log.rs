//! Logging setup for binaries built on knob
//!
//! The filter is read from `RUST_LOG` and defaults to `info`. Records emitted through the
//! `log` crate are forwarded too.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// # Panics
///
/// If a global subscriber was already installed, see [`try_init`] for the fallible
/// version.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).try_init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
