//! One-time logging bootstrap for modules loaded into a host process.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static LOG_INIT_ONCE: Once = Once::new();

/// Install the global `tracing` subscriber, filtered by `FRAMEFX_LOG`.
///
/// Safe to call from every module's load path; only the first call does
/// anything, and a subscriber already installed by the host wins.
pub fn init() {
    LOG_INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env("FRAMEFX_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}
