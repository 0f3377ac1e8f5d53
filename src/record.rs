//! Row types for daily activity exports.
//!
//! [`RawActivityRow`] mirrors the CSV schema one-to-one. Once its date has
//! been parsed it becomes an [`ActivityRecord`], the unit every later stage
//! works with.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::DateParseError;
use crate::features;

pub const ID_COLUMN: &str = "Id";
pub const DATE_COLUMN: &str = "ActivityDate";

/// Numeric columns of a daily activity export, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    TotalSteps,
    TotalDistance,
    TrackerDistance,
    LoggedActivitiesDistance,
    VeryActiveDistance,
    ModeratelyActiveDistance,
    LightActiveDistance,
    SedentaryActiveDistance,
    VeryActiveMinutes,
    FairlyActiveMinutes,
    LightlyActiveMinutes,
    SedentaryMinutes,
    Calories,
}

impl Metric {
    pub const COUNT: usize = 13;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TotalSteps,
        Metric::TotalDistance,
        Metric::TrackerDistance,
        Metric::LoggedActivitiesDistance,
        Metric::VeryActiveDistance,
        Metric::ModeratelyActiveDistance,
        Metric::LightActiveDistance,
        Metric::SedentaryActiveDistance,
        Metric::VeryActiveMinutes,
        Metric::FairlyActiveMinutes,
        Metric::LightlyActiveMinutes,
        Metric::SedentaryMinutes,
        Metric::Calories,
    ];

    /// Header name of this metric in the export.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalSteps => "TotalSteps",
            Metric::TotalDistance => "TotalDistance",
            Metric::TrackerDistance => "TrackerDistance",
            Metric::LoggedActivitiesDistance => "LoggedActivitiesDistance",
            Metric::VeryActiveDistance => "VeryActiveDistance",
            Metric::ModeratelyActiveDistance => "ModeratelyActiveDistance",
            Metric::LightActiveDistance => "LightActiveDistance",
            Metric::SedentaryActiveDistance => "SedentaryActiveDistance",
            Metric::VeryActiveMinutes => "VeryActiveMinutes",
            Metric::FairlyActiveMinutes => "FairlyActiveMinutes",
            Metric::LightlyActiveMinutes => "LightlyActiveMinutes",
            Metric::SedentaryMinutes => "SedentaryMinutes",
            Metric::Calories => "Calories",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every header a daily activity export must carry.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    [ID_COLUMN, DATE_COLUMN]
        .into_iter()
        .chain(Metric::ALL.iter().map(|m| m.column()))
}

/// A single row deserialized from a daily activity CSV file.
///
/// Empty numeric cells deserialize to `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityRow {
    #[serde(rename = "Id")]
    pub user_id: String,
    #[serde(rename = "ActivityDate")]
    pub activity_date: String,

    #[serde(rename = "TotalSteps")]
    pub total_steps: Option<f64>,
    #[serde(rename = "TotalDistance")]
    pub total_distance: Option<f64>,
    #[serde(rename = "TrackerDistance")]
    pub tracker_distance: Option<f64>,
    #[serde(rename = "LoggedActivitiesDistance")]
    pub logged_activities_distance: Option<f64>,

    // distance by intensity
    #[serde(rename = "VeryActiveDistance")]
    pub very_active_distance: Option<f64>,
    #[serde(rename = "ModeratelyActiveDistance")]
    pub moderately_active_distance: Option<f64>,
    #[serde(rename = "LightActiveDistance")]
    pub light_active_distance: Option<f64>,
    #[serde(rename = "SedentaryActiveDistance")]
    pub sedentary_active_distance: Option<f64>,

    // minutes by intensity
    #[serde(rename = "VeryActiveMinutes")]
    pub very_active_minutes: Option<f64>,
    #[serde(rename = "FairlyActiveMinutes")]
    pub fairly_active_minutes: Option<f64>,
    #[serde(rename = "LightlyActiveMinutes")]
    pub lightly_active_minutes: Option<f64>,
    #[serde(rename = "SedentaryMinutes")]
    pub sedentary_minutes: Option<f64>,

    #[serde(rename = "Calories")]
    pub calories: Option<f64>,
}

/// Values of every [`Metric`] for one row. `None` marks a missing cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivityMetrics {
    values: [Option<f64>; Metric::COUNT],
}

impl ActivityMetrics {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// Stores a value, treating `NaN` as missing.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.values[metric.index()] = value.filter(|v| !v.is_nan());
    }

    /// Builder form of [`ActivityMetrics::set`].
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// Adds `other` into `self` column by column.
    ///
    /// Missing values are skipped; a column stays missing only when it is
    /// missing on both sides. A `NaN` sum is stored as missing, as in
    /// [`ActivityMetrics::set`].
    pub fn absorb(&mut self, other: &ActivityMetrics) {
        for (mine, theirs) in self.values.iter_mut().zip(other.values.iter()) {
            *mine = match (*mine, *theirs) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            }
            .filter(|v| !v.is_nan());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        Metric::ALL.iter().map(move |m| (*m, self.get(*m)))
    }
}

macro_rules! metrics_from_row {
    ($row:expr, { $($variant:ident => $field:ident),* $(,)? }) => {{
        let mut metrics = ActivityMetrics::default();
        $( metrics.set(Metric::$variant, $row.$field); )*
        metrics
    }};
}

impl From<&RawActivityRow> for ActivityMetrics {
    fn from(row: &RawActivityRow) -> Self {
        metrics_from_row!(row, {
            TotalSteps => total_steps,
            TotalDistance => total_distance,
            TrackerDistance => tracker_distance,
            LoggedActivitiesDistance => logged_activities_distance,
            VeryActiveDistance => very_active_distance,
            ModeratelyActiveDistance => moderately_active_distance,
            LightActiveDistance => light_active_distance,
            SedentaryActiveDistance => sedentary_active_distance,
            VeryActiveMinutes => very_active_minutes,
            FairlyActiveMinutes => fairly_active_minutes,
            LightlyActiveMinutes => lightly_active_minutes,
            SedentaryMinutes => sedentary_minutes,
            Calories => calories,
        })
    }
}

/// Identity of a cleaned record: one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityKey {
    pub user_id: String,
    pub date: NaiveDate,
}

/// One user-day of activity with a parsed date.
///
/// Weekday and the active totals are computed on read from `date` and
/// `metrics`; they are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub user_id: String,
    pub date: NaiveDate,
    /// Date text as it appeared in the source file.
    pub date_text: String,
    pub metrics: ActivityMetrics,
}

impl ActivityRecord {
    pub fn new(
        user_id: impl Into<String>,
        date_text: &str,
        metrics: ActivityMetrics,
    ) -> Result<Self, DateParseError> {
        let user_id = user_id.into();
        let date = features::parse_activity_date(date_text, &user_id)?;
        Ok(Self {
            user_id,
            date,
            date_text: date_text.to_string(),
            metrics,
        })
    }

    pub fn key(&self) -> ActivityKey {
        ActivityKey {
            user_id: self.user_id.clone(),
            date: self.date,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric)
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn weekday_name(&self) -> &'static str {
        features::weekday_name(self.weekday())
    }

    pub fn total_active_distance(&self) -> Option<f64> {
        features::total_active_distance(&self.metrics)
    }

    pub fn total_active_minutes(&self) -> Option<f64> {
        features::total_active_minutes(&self.metrics)
    }
}

impl TryFrom<RawActivityRow> for ActivityRecord {
    type Error = DateParseError;

    fn try_from(row: RawActivityRow) -> Result<Self, Self::Error> {
        let metrics = ActivityMetrics::from(&row);
        let date = features::parse_activity_date(&row.activity_date, &row.user_id)?;
        Ok(Self {
            user_id: row.user_id,
            date,
            date_text: row.activity_date,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_columns_match_all_order() {
        let columns: Vec<_> = required_columns().collect();
        assert_eq!(columns.len(), Metric::COUNT + 2);
        assert_eq!(columns[0], "Id");
        assert_eq!(columns[1], "ActivityDate");
        assert_eq!(columns[2], "TotalSteps");
        assert_eq!(columns[14], "Calories");
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_set_treats_nan_as_missing() {
        let mut metrics = ActivityMetrics::default();
        metrics.set(Metric::Calories, Some(f64::NAN));
        assert_eq!(metrics.get(Metric::Calories), None);
    }

    #[test]
    fn test_absorb_sums_present_values() {
        let mut a = ActivityMetrics::default()
            .with(Metric::TotalSteps, 1000.0)
            .with(Metric::Calories, 200.0);
        let b = ActivityMetrics::default()
            .with(Metric::TotalSteps, 500.0)
            .with(Metric::SedentaryMinutes, 30.0);

        a.absorb(&b);

        assert_eq!(a.get(Metric::TotalSteps), Some(1500.0));
        assert_eq!(a.get(Metric::Calories), Some(200.0));
        assert_eq!(a.get(Metric::SedentaryMinutes), Some(30.0));
        assert_eq!(a.get(Metric::TrackerDistance), None);
    }

    #[test]
    fn test_absorb_never_stores_nan() {
        let mut a = ActivityMetrics::default().with(Metric::TotalSteps, f64::INFINITY);
        let b = ActivityMetrics::default().with(Metric::TotalSteps, f64::NEG_INFINITY);

        a.absorb(&b);

        assert_eq!(a.get(Metric::TotalSteps), None);
        assert!(a.iter().all(|(_, v)| v.is_none_or(|x| !x.is_nan())));
    }

    #[test]
    fn test_record_from_raw_row() {
        let row = RawActivityRow {
            user_id: "1503960366".to_string(),
            activity_date: "4/12/2016".to_string(),
            total_steps: Some(13162.0),
            total_distance: Some(8.5),
            tracker_distance: Some(8.5),
            logged_activities_distance: Some(0.0),
            very_active_distance: Some(1.88),
            moderately_active_distance: Some(0.55),
            light_active_distance: Some(6.06),
            sedentary_active_distance: Some(0.0),
            very_active_minutes: Some(25.0),
            fairly_active_minutes: Some(13.0),
            lightly_active_minutes: Some(328.0),
            sedentary_minutes: Some(728.0),
            calories: None,
        };

        let record = ActivityRecord::try_from(row).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2016, 4, 12).unwrap());
        assert_eq!(record.date_text, "4/12/2016");
        assert_eq!(record.weekday_name(), "Tuesday");
        assert_eq!(record.value(Metric::TotalSteps), Some(13162.0));
        assert_eq!(record.value(Metric::Calories), None);
        assert_eq!(record.total_active_minutes(), Some(366.0));
    }
}
