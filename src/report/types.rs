//! Data types produced by the reporting layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean, spread and 95% interval of one set of values.
///
/// `sd`, `standard_error` and the interval bounds are `None` below two values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: f64,
    pub sd: Option<f64>,
    pub standard_error: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
}

/// [`SummaryStats`] for one group (a weekday, a user, a date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

/// Boxplot figures with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Least-squares line through the per-date means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub slope_per_day: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub points: usize,
}

/// Everything reported about a single measure.
#[derive(Debug, Clone, Serialize)]
pub struct MeasureReport {
    pub overall: Option<SummaryStats>,
    pub distribution: Option<Distribution>,
    pub histogram: Option<Histogram>,
    pub by_weekday: Vec<GroupSummary>,
    pub by_user: Vec<GroupSummary>,
    pub by_date: Vec<GroupSummary>,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

/// Complete report over a cleaned table, written as `report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub user_count: usize,
    pub date_range: Option<DateRange>,
    pub measures: BTreeMap<String, MeasureReport>,
    pub steps_calories_correlation: Option<f64>,
    pub active_minutes_calories_correlation: Option<f64>,
    pub highlights: Vec<String>,
}
