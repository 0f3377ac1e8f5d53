//! Per-measure summaries grouped by weekday, user and date, plus trends.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::features::{WEEKDAY_ORDER, weekday_name};
use crate::record::{ActivityRecord, Metric};
use crate::report::distribution::{DEFAULT_BINS, distribution, histogram};
use crate::report::highlights::highlights;
use crate::report::measure::Measure;
use crate::report::types::{
    ActivityReport, DateRange, GroupSummary, MeasureReport, SummaryStats, Trend,
};
use crate::report::utility::{
    confidence_interval_95, linear_fit, mean, pearson, sample_stddev, standard_error,
};

pub const SCHEMA_VERSION: u8 = 1;

/// Tunables for [`build_report`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub histogram_bins: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_BINS,
        }
    }
}

/// Mean, sample sd, standard error and 95% interval. `None` for empty input.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let avg = mean(values);
    let sd = sample_stddev(values, avg);
    let se = sd.map(|sd| standard_error(sd, n));
    let ci = se.map(|se| confidence_interval_95(avg, se));

    Some(SummaryStats {
        n,
        mean: avg,
        sd,
        standard_error: se,
        ci_low: ci.map(|(low, _)| low),
        ci_high: ci.map(|(_, high)| high),
    })
}

fn summarize_groups<K>(
    groups: impl IntoIterator<Item = (K, Vec<f64>)>,
    label: impl Fn(&K) -> String,
) -> Vec<GroupSummary> {
    groups
        .into_iter()
        .filter_map(|(key, values)| {
            summarize(&values).map(|stats| GroupSummary {
                group: label(&key),
                stats,
            })
        })
        .collect()
}

/// Per-weekday summaries ordered Sunday to Saturday. Weekdays without data
/// are omitted.
pub fn by_weekday(records: &[ActivityRecord], measure: Measure) -> Vec<GroupSummary> {
    let mut buckets: [Vec<f64>; 7] = Default::default();
    for record in records {
        if let Some(v) = measure.value(record) {
            buckets[record.weekday().num_days_from_sunday() as usize].push(v);
        }
    }

    summarize_groups(WEEKDAY_ORDER.into_iter().zip(buckets), |day| {
        weekday_name(*day).to_string()
    })
}

/// Per-user summaries ordered by user id.
pub fn by_user(records: &[ActivityRecord], measure: Measure) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(v) = measure.value(record) {
            groups.entry(record.user_id.as_str()).or_default().push(v);
        }
    }

    summarize_groups(groups, |user| user.to_string())
}

fn daily_values(
    records: &[ActivityRecord],
    measure: Measure,
) -> BTreeMap<NaiveDate, Vec<f64>> {
    let mut groups: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(v) = measure.value(record) {
            groups.entry(record.date).or_default().push(v);
        }
    }
    groups
}

/// Per-date summaries in calendar order, labelled `YYYY-MM-DD`.
pub fn by_date(records: &[ActivityRecord], measure: Measure) -> Vec<GroupSummary> {
    summarize_groups(daily_values(records, measure), |date| date.to_string())
}

/// Straight-line trend of the daily means against days since the first date.
pub fn trend(records: &[ActivityRecord], measure: Measure) -> Option<Trend> {
    let daily = daily_values(records, measure);
    let first = *daily.keys().next()?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = daily
        .iter()
        .map(|(date, values)| ((*date - first).num_days() as f64, mean(values)))
        .unzip();

    let (slope_per_day, intercept, r_squared) = linear_fit(&xs, &ys)?;
    Some(Trend {
        slope_per_day,
        intercept,
        r_squared,
        points: xs.len(),
    })
}

/// Pearson correlation over records where both measures are present.
pub fn correlation(records: &[ActivityRecord], x: Measure, y: Measure) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter_map(|r| Some((x.value(r)?, y.value(r)?)))
        .unzip();
    pearson(&xs, &ys)
}

pub fn measure_report(
    records: &[ActivityRecord],
    measure: Measure,
    options: &ReportOptions,
) -> MeasureReport {
    let values = measure.values(records);

    MeasureReport {
        overall: summarize(&values),
        distribution: distribution(&values),
        histogram: histogram(&values, options.histogram_bins),
        by_weekday: by_weekday(records, measure),
        by_user: by_user(records, measure),
        by_date: by_date(records, measure),
        trend: trend(records, measure),
    }
}

/// Builds the full report over a cleaned table.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn build_report(records: &[ActivityRecord], options: &ReportOptions) -> ActivityReport {
    let users: BTreeSet<&str> = records.iter().map(|r| r.user_id.as_str()).collect();

    let date_range = match (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) {
        (Some(start), Some(end)) => Some(DateRange {
            start,
            end,
            days: (end - start).num_days() + 1,
        }),
        _ => None,
    };

    let measures = Measure::REPORTED
        .iter()
        .map(|m| (m.name().to_string(), measure_report(records, *m, options)))
        .collect();

    let mut report = ActivityReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        record_count: records.len(),
        user_count: users.len(),
        date_range,
        measures,
        steps_calories_correlation: correlation(
            records,
            Measure::Column(Metric::TotalSteps),
            Measure::Column(Metric::Calories),
        ),
        active_minutes_calories_correlation: correlation(
            records,
            Measure::TotalActiveMinutes,
            Measure::Column(Metric::Calories),
        ),
        highlights: Vec::new(),
    };
    report.highlights = highlights(&report);

    info!(
        users = report.user_count,
        measures = report.measures.len(),
        "Report built"
    );
    report
}
