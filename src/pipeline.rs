//! Load → parse → combine, as one fallible batch step.

use std::path::Path;

use tracing::info;

use crate::combine::{self, Deduplicated};
use crate::error::{DateParseError, PipelineError};
use crate::loader;
use crate::quality::DataQualityWarning;
use crate::record::{ActivityRecord, RawActivityRow};

/// The cleaned activity table. Read-only once built.
#[derive(Debug)]
pub struct CleanedTable {
    records: Vec<ActivityRecord>,
    duplicates: Vec<ActivityRecord>,
    anomalies: Vec<DataQualityWarning>,
    raw_row_count: usize,
    merged_groups: usize,
}

impl CleanedTable {
    /// One record per `(user id, date)`, ordered by key.
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Raw rows whose key occurred more than once before aggregation.
    pub fn duplicates(&self) -> &[ActivityRecord] {
        &self.duplicates
    }

    pub fn anomalies(&self) -> &[DataQualityWarning] {
        &self.anomalies
    }

    pub fn raw_row_count(&self) -> usize {
        self.raw_row_count
    }

    pub fn merged_groups(&self) -> usize {
        self.merged_groups
    }
}

/// Parses the date of every row. The first bad date fails the whole batch.
pub fn parse_rows(rows: Vec<RawActivityRow>) -> Result<Vec<ActivityRecord>, DateParseError> {
    rows.into_iter().map(ActivityRecord::try_from).collect()
}

/// Builds the cleaned table from two already-loaded exports.
pub fn clean(
    first: Vec<RawActivityRow>,
    second: Vec<RawActivityRow>,
) -> Result<CleanedTable, DateParseError> {
    let all = combine::concat(parse_rows(first)?, parse_rows(second)?);
    let raw_row_count = all.len();
    let duplicates = combine::duplicates(&all);

    let Deduplicated {
        records,
        merged_groups,
        anomalies,
    } = combine::deduplicate(all);

    info!(
        raw_rows = raw_row_count,
        duplicate_rows = duplicates.len(),
        records = records.len(),
        "Cleaned table built"
    );

    Ok(CleanedTable {
        records,
        duplicates,
        anomalies,
        raw_row_count,
        merged_groups,
    })
}

/// Loads both exports from disk and cleans them.
///
/// # Errors
///
/// Any [`crate::error::DataSourceError`] or [`DateParseError`] aborts the run.
#[tracing::instrument(fields(first = %first.display(), second = %second.display()))]
pub fn run(first: &Path, second: &Path) -> Result<CleanedTable, PipelineError> {
    let (a, b) = loader::load_pair(first, second)?;
    Ok(clean(a, b)?)
}
