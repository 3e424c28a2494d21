//! Study calendar - the ordered dates a plan may use

use chrono::{Datelike, NaiveDate, Weekday};

/// Every day of the week, Monday first
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Dates in `start..=end` falling on one of `weekdays`, in order
///
/// An inverted range or an empty weekday list yields no dates.
pub fn available_dates(start: NaiveDate, end: NaiveDate, weekdays: &[Weekday]) -> Vec<NaiveDate> {
    if start > end || weekdays.is_empty() {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| weekdays.contains(&d.weekday()))
        .collect()
}
