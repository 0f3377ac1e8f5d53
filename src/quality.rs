//! Advisory data-quality checks over the cleaned table.
//!
//! Nothing here mutates records or fails the run. Findings are returned as a
//! [`QualityReport`] and logged at `warn`.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::record::{ActivityRecord, ID_COLUMN, Metric};

pub const TOTAL_ACTIVE_DISTANCE_COLUMN: &str = "TotalActiveDistance";
pub const TOTAL_ACTIVE_MINUTES_COLUMN: &str = "TotalActiveMinutes";

/// A non-fatal finding about the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    DuplicateKeys {
        count: usize,
    },
    MissingValues {
        column: String,
        count: usize,
    },
    NegativeValues {
        column: String,
        count: usize,
    },
    InconsistentDateText {
        user_id: String,
        date: NaiveDate,
        variants: Vec<String>,
    },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::DuplicateKeys { count } => {
                write!(f, "{count} (user, date) keys still duplicated after cleaning")
            }
            DataQualityWarning::MissingValues { column, count } => {
                write!(f, "{count} missing values in {column}")
            }
            DataQualityWarning::NegativeValues { column, count } => {
                write!(f, "{count} negative values in {column}")
            }
            DataQualityWarning::InconsistentDateText {
                user_id,
                date,
                variants,
            } => write!(
                f,
                "user {user_id} on {date} has differing date text {variants:?}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCount {
    pub column: String,
    pub count: usize,
}

/// Result of [`check`].
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub duplicate_keys_remaining: bool,
    pub duplicate_key_count: usize,
    /// Every column in file order, zero counts included.
    pub missing_by_column: Vec<ColumnCount>,
    /// Only columns that contain negative values.
    pub negative_by_column: Vec<ColumnCount>,
    pub warnings: Vec<DataQualityWarning>,
}

impl QualityReport {
    pub fn missing(&self, column: &str) -> Option<usize> {
        self.missing_by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.count)
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Inspects cleaned records. `anomalies` are findings carried over from
/// earlier stages and are appended to the report's warnings.
#[tracing::instrument(skip_all, fields(rows = records.len()))]
pub fn check(records: &[ActivityRecord], anomalies: &[DataQualityWarning]) -> QualityReport {
    let duplicate_key_count = count_duplicate_keys(records);

    // ActivityDate is absent here: a record only exists once its date parsed.
    let mut missing_by_column = vec![
        ColumnCount {
            column: ID_COLUMN.to_string(),
            count: records.iter().filter(|r| r.user_id.trim().is_empty()).count(),
        },
    ];
    let mut negative_by_column = Vec::new();

    for metric in Metric::ALL {
        let values = records.iter().map(|r| r.value(metric));
        let (missing, negative) = tally(values);
        missing_by_column.push(ColumnCount {
            column: metric.column().to_string(),
            count: missing,
        });
        if negative > 0 {
            negative_by_column.push(ColumnCount {
                column: metric.column().to_string(),
                count: negative,
            });
        }
    }

    for (column, values) in [
        (
            TOTAL_ACTIVE_DISTANCE_COLUMN,
            records
                .iter()
                .map(|r| r.total_active_distance())
                .collect::<Vec<_>>(),
        ),
        (
            TOTAL_ACTIVE_MINUTES_COLUMN,
            records.iter().map(|r| r.total_active_minutes()).collect(),
        ),
    ] {
        let (missing, _) = tally(values.into_iter());
        missing_by_column.push(ColumnCount {
            column: column.to_string(),
            count: missing,
        });
    }

    let mut warnings = Vec::new();
    if duplicate_key_count > 0 {
        warnings.push(DataQualityWarning::DuplicateKeys {
            count: duplicate_key_count,
        });
    }
    for c in missing_by_column.iter().filter(|c| c.count > 0) {
        warnings.push(DataQualityWarning::MissingValues {
            column: c.column.clone(),
            count: c.count,
        });
    }
    for c in &negative_by_column {
        warnings.push(DataQualityWarning::NegativeValues {
            column: c.column.clone(),
            count: c.count,
        });
    }
    warnings.extend(anomalies.iter().cloned());

    for w in &warnings {
        warn!(warning = %w, "Data quality");
    }
    info!(warnings = warnings.len(), "Data quality check complete");

    QualityReport {
        row_count: records.len(),
        duplicate_keys_remaining: duplicate_key_count > 0,
        duplicate_key_count,
        missing_by_column,
        negative_by_column,
        warnings,
    }
}

/// Number of distinct keys that occur more than once.
fn count_duplicate_keys(records: &[ActivityRecord]) -> usize {
    let mut seen = HashSet::new();
    let mut repeated = HashSet::new();
    for record in records {
        let key = record.key();
        if !seen.insert(key.clone()) {
            repeated.insert(key);
        }
    }
    repeated.len()
}

fn tally(values: impl Iterator<Item = Option<f64>>) -> (usize, usize) {
    values.fold((0, 0), |(missing, negative), v| match v {
        None => (missing + 1, negative),
        Some(x) if x < 0.0 => (missing, negative + 1),
        Some(_) => (missing, negative),
    })
}
