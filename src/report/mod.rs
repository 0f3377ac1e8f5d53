//! Grouped statistics over the cleaned activity table.
//!
//! Consumes records read-only and computes means, standard errors and 95%
//! confidence intervals by weekday, user and date, plus the distribution,
//! trend and correlation figures behind each chart. Rendering is left to
//! whatever reads `report.json`.

pub mod aggregate;
pub mod distribution;
pub mod highlights;
pub mod measure;
pub mod types;
pub mod utility;

pub use aggregate::{ReportOptions, build_report};
pub use measure::Measure;
pub use types::ActivityReport;
