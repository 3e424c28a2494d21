//! Daily study capacity derived from a learner profile

use crate::config::MAX_DAILY_HOURS;
use crate::model::{LearnerProfile, StudyTimePreference};

/// Hours per day for a learner with a typical attention span
pub const BASE_DAILY_HOURS: f64 = 3.0;

/// Hours modeled as absorbable in one day, in `[0, max_daily_hours]`
///
/// A negative or NaN cap is treated as zero.
pub fn daily_capacity_hours(profile: Option<&LearnerProfile>, max_daily_hours: f64) -> f64 {
    let max_daily_hours = max_daily_hours.max(0.0);
    let Some(profile) = profile else {
        return BASE_DAILY_HOURS.clamp(0.0, max_daily_hours);
    };

    let base = match profile.attention_span_minutes {
        m if m < 30 => 2.0,
        m if m > 90 => 4.0,
        _ => BASE_DAILY_HOURS,
    };

    let multiplier = match profile.study_time_preference {
        StudyTimePreference::Morning => 1.1,
        StudyTimePreference::Evening => 0.9,
        _ => 1.0,
    };

    (base * multiplier).clamp(0.0, max_daily_hours)
}

/// Capacity with the default six-hour cap
#[inline]
pub fn default_daily_capacity_hours(profile: Option<&LearnerProfile>) -> f64 {
    daily_capacity_hours(profile, MAX_DAILY_HOURS)
}
