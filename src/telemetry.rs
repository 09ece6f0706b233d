//! Tracing setup.
//!
//! Natively a `tracing-subscriber` fmt subscriber prints to stdout. In the
//! browser there is no stdout and no system clock, so no tracing subscriber
//! is installed; events fall through to `log` records (tracing's `log`
//! feature) and `console_log` forwards those to the browser console.

#[cfg(test)]
#[path = "telemetry_test.rs"]
mod telemetry_test;

/// Install the process-wide logger. Safe to call more than once; later calls
/// leave the first logger in place.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    if let Err(e) = tracing_subscriber::fmt().with_target(false).try_init() {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

/// Install the panic hook and the browser console logger. Safe to call more
/// than once.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        tracing::debug!(error = %e, "console logger already installed");
    }
}
