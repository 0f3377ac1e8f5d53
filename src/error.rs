//! Fatal error types for the cleaning pipeline.
//!
//! Data-quality findings are not errors; see [`crate::quality`].

use std::path::PathBuf;

/// A source file could not be used as a daily activity export.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("schema mismatch in {}: missing columns {missing:?}", .path.display())]
    SchemaMismatch { path: PathBuf, missing: Vec<String> },

    #[error("non-finite value {value} in {} data row {row}, column {column}", .path.display())]
    NonFinite {
        path: PathBuf,
        /// 1-based data row, header excluded.
        row: usize,
        column: &'static str,
        value: f64,
    },
}

/// A date cell did not match the `month/day/year` format.
#[derive(Debug, thiserror::Error)]
#[error("unparseable activity date {value:?} for user {user_id}: {source}")]
pub struct DateParseError {
    pub value: String,
    pub user_id: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Any error that aborts a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    DateParse(#[from] DateParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message_lists_columns() {
        let err = DataSourceError::SchemaMismatch {
            path: PathBuf::from("data/dailyActivity.csv"),
            missing: vec!["Calories".to_string(), "TotalSteps".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("data/dailyActivity.csv"));
        assert!(msg.contains("Calories"));
        assert!(msg.contains("TotalSteps"));
    }

    #[test]
    fn test_pipeline_error_is_transparent() {
        let source = chrono::NaiveDate::parse_from_str("soon", "%m/%d/%Y").unwrap_err();
        let err: PipelineError = DateParseError {
            value: "soon".to_string(),
            user_id: "42".to_string(),
            source,
        }
        .into();
        assert!(err.to_string().starts_with("unparseable activity date \"soon\""));
    }
}
