//! Derived columns: parsed dates, weekday names and active totals.
//!
//! Everything here is a pure function of existing columns.

use chrono::{NaiveDate, Weekday};

use crate::error::DateParseError;
use crate::record::{ActivityMetrics, Metric};

/// Date format used by the exports, e.g. `4/12/2016`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Weekdays in presentation order.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub const ACTIVE_DISTANCE_PARTS: [Metric; 3] = [
    Metric::VeryActiveDistance,
    Metric::ModeratelyActiveDistance,
    Metric::LightActiveDistance,
];

pub const ACTIVE_MINUTES_PARTS: [Metric; 3] = [
    Metric::VeryActiveMinutes,
    Metric::FairlyActiveMinutes,
    Metric::LightlyActiveMinutes,
];

/// Parses a `month/day/year` date cell. Month and day may be one or two digits.
///
/// # Errors
///
/// Returns [`DateParseError`] when the text is not a valid calendar date in
/// that format. There is no fallback date.
pub fn parse_activity_date(text: &str, user_id: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|source| DateParseError {
        value: text.to_string(),
        user_id: user_id.to_string(),
        source,
    })
}

/// English day name, independent of locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Sum of the named parts, or `None` if any part is missing.
pub fn sum_parts(metrics: &ActivityMetrics, parts: &[Metric]) -> Option<f64> {
    parts
        .iter()
        .map(|m| metrics.get(*m))
        .sum::<Option<f64>>()
}

/// `VeryActiveDistance + ModeratelyActiveDistance + LightActiveDistance`.
pub fn total_active_distance(metrics: &ActivityMetrics) -> Option<f64> {
    sum_parts(metrics, &ACTIVE_DISTANCE_PARTS)
}

/// `VeryActiveMinutes + FairlyActiveMinutes + LightlyActiveMinutes`.
pub fn total_active_minutes(metrics: &ActivityMetrics) -> Option<f64> {
    sum_parts(metrics, &ACTIVE_MINUTES_PARTS)
}
