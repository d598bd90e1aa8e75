//! Logging bootstrap for binaries and tests
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to whoever owns `main`.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init`], with a custom fallback filter such as `"agenda=debug"`
pub fn init_with_default(directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
