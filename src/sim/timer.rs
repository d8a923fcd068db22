//! Sprint countdown
//!
//! Timestamps are wall-clock seconds (`f64`). Everything here is a pure
//! function of the instants passed in.

/// Seconds since `start`, never negative. Zero when no sprint is running.
#[inline]
pub fn elapsed_seconds(start: Option<f64>, now: f64) -> f64 {
    match start {
        Some(start) => (now - start).max(0.0),
        None => 0.0,
    }
}

/// Whole seconds left in the sprint.
///
/// Returns the full `duration` when `start` is unset so idle displays read
/// "15s" rather than "0s".
pub fn remaining_seconds(start: Option<f64>, duration: u32, now: f64) -> u32 {
    if start.is_none() {
        return duration;
    }
    let elapsed = elapsed_seconds(start, now).floor();
    if elapsed >= duration as f64 {
        0
    } else {
        duration - elapsed as u32
    }
}

/// True once `now - start >= duration`
#[inline]
pub fn is_expired(start: Option<f64>, duration: u32, now: f64) -> bool {
    match start {
        Some(start) => now - start >= duration as f64,
        None => false,
    }
}
