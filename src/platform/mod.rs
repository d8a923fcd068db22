//! Platform abstraction layer
//!
//! Handles browser/native differences for wall-clock time. The simulation
//! never reads the clock itself; shells call [`now_secs`] and pass the value in.

/// Wall-clock seconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

/// Wall-clock seconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
