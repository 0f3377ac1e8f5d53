//! CSV loader for daily activity exports.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::DataSourceError;
use crate::record::{ActivityMetrics, RawActivityRow, required_columns};

/// Reads every row of a daily activity export at `path`.
///
/// # Errors
///
/// Fails with [`DataSourceError`] if the file cannot be opened, a required
/// column is absent, any cell fails to deserialize, or a cell is infinite.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_daily_activity(path: &Path) -> Result<Vec<RawActivityRow>, DataSourceError> {
    let file = File::open(path).map_err(|source| DataSourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = read_daily_activity(file, path)?;
    info!(rows = rows.len(), "Loaded daily activity export");
    Ok(rows)
}

/// Loads both exports. The first failure aborts the pair.
pub fn load_pair(
    first: &Path,
    second: &Path,
) -> Result<(Vec<RawActivityRow>, Vec<RawActivityRow>), DataSourceError> {
    let a = load_daily_activity(first)?;
    let b = load_daily_activity(second)?;
    Ok((a, b))
}

/// Reads an export from any reader. `origin` is only used in errors.
pub fn read_daily_activity<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<Vec<RawActivityRow>, DataSourceError> {
    let malformed = |source| DataSourceError::Malformed {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(malformed)?.clone();
    check_headers(&headers, origin)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: RawActivityRow = result.map_err(malformed)?;
        check_finite(&row, i + 1, origin)?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "Deserialized rows");
    Ok(rows)
}

/// Rejects `inf`/`-inf` cells. `NaN` is let through and read as missing.
fn check_finite(
    row: &RawActivityRow,
    row_number: usize,
    origin: &Path,
) -> Result<(), DataSourceError> {
    let bad = ActivityMetrics::from(row)
        .iter()
        .find_map(|(metric, v)| v.filter(|x| x.is_infinite()).map(|x| (metric, x)));

    match bad {
        Some((metric, value)) => Err(DataSourceError::NonFinite {
            path: origin.to_path_buf(),
            row: row_number,
            column: metric.column(),
            value,
        }),
        None => Ok(()),
    }
}

/// Verifies that every required column is present.
///
/// Unknown extra columns are logged and otherwise ignored.
pub fn check_headers(headers: &StringRecord, origin: &Path) -> Result<(), DataSourceError> {
    let missing: Vec<String> = required_columns()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(DataSourceError::SchemaMismatch {
            path: origin.to_path_buf(),
            missing,
        });
    }

    for extra in headers
        .iter()
        .filter(|h| !required_columns().any(|column| column == *h))
    {
        warn!(column = extra, "Ignoring unknown column");
    }

    Ok(())
}
