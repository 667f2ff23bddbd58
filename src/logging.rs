//! Tracing setup for binaries embedding the store
//!
//! The library itself only emits `tracing` events; hosts call
//! [`init_logging`] once at startup to get them onto stderr. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "polystore=info";

/// Initialize a stderr subscriber with an env-overridable filter.
/// Calling it twice is a no-op rather than an error.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
