//! Retention Model
//!
//! Ebbinghaus-style exponential decay: `R = e^(-t/S)` where `t` is elapsed
//! time relative to the scheduled interval and `S` grows with the interval.
//! Deliberately simple and reproducible bit-for-bit for identical inputs.

/// Strength gained per scheduled interval day
pub const STRENGTH_PER_INTERVAL_DAY: f64 = 0.5;

/// Probability that the topic is still recalled
///
/// `interval_days` must be at least 1; callers validate before invoking.
#[inline]
pub fn retention(days_since_last_review: f64, interval_days: u32) -> f64 {
    debug_assert!(interval_days >= 1, "interval_days must be validated by the caller");
    let interval = f64::from(interval_days);
    let time_ratio = days_since_last_review / interval;
    let strength = interval * STRENGTH_PER_INTERVAL_DAY;
    (-time_ratio / strength).exp()
}

/// Probability that the topic has been forgotten, clamped to [0, 1]
#[inline]
pub fn forgetting_probability(days_since_last_review: f64, interval_days: u32) -> f64 {
    (1.0 - retention(days_since_last_review, interval_days)).clamp(0.0, 1.0)
}
