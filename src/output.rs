//! Output formatting and persistence for cleaned tables and reports.
//!
//! Supports JSON artifacts, plain CSV and gzip-compressed CSV.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::features::weekday_name;
use crate::quality::{TOTAL_ACTIVE_DISTANCE_COLUMN, TOTAL_ACTIVE_MINUTES_COLUMN};
use crate::record::{ActivityRecord, DATE_COLUMN, ID_COLUMN, Metric};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const ISO_DATE_COLUMN: &str = "Date";
const WEEKDAY_COLUMN: &str = "Weekday";

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Header row of the cleaned table.
pub fn cleaned_headers() -> Vec<&'static str> {
    let mut headers = vec![ID_COLUMN, DATE_COLUMN, ISO_DATE_COLUMN, WEEKDAY_COLUMN];
    headers.extend(Metric::ALL.iter().map(|m| m.column()));
    headers.push(TOTAL_ACTIVE_DISTANCE_COLUMN);
    headers.push(TOTAL_ACTIVE_MINUTES_COLUMN);
    headers
}

/// Writes cleaned records with their derived columns. Missing values are
/// written as empty cells.
pub fn write_cleaned_to<W: Write>(writer: W, records: &[ActivityRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(cleaned_headers())?;

    for r in records {
        let mut row = vec![
            r.user_id.clone(),
            r.date_text.clone(),
            r.date.to_string(),
            weekday_name(r.weekday()).to_string(),
        ];
        row.extend(r.metrics.iter().map(|(_, v)| cell(v)));
        row.push(cell(r.total_active_distance()));
        row.push(cell(r.total_active_minutes()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes records in the source export layout.
pub fn write_raw_to<W: Write>(writer: W, records: &[ActivityRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    let mut headers = vec![ID_COLUMN, DATE_COLUMN];
    headers.extend(Metric::ALL.iter().map(|m| m.column()));
    wtr.write_record(&headers)?;

    for r in records {
        let mut row = vec![r.user_id.clone(), r.date_text.clone()];
        row.extend(r.metrics.iter().map(|(_, v)| cell(v)));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the cleaned table to `path`, gzip-compressed when `gzip` is set.
pub fn write_cleaned(path: &Path, records: &[ActivityRecord], gzip: bool) -> Result<()> {
    let file = File::create(path)?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_cleaned_to(&mut encoder, records)?;
        encoder.finish()?;
    } else {
        write_cleaned_to(file, records)?;
    }

    info!(path = %path.display(), rows = records.len(), gzip, "Wrote cleaned table");
    Ok(())
}

/// Writes the pre-aggregation duplicates view to `path`.
pub fn write_duplicates(path: &Path, records: &[ActivityRecord]) -> Result<()> {
    write_raw_to(File::create(path)?, records)?;
    info!(path = %path.display(), rows = records.len(), "Wrote duplicates view");
    Ok(())
}
