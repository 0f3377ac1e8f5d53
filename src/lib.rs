//! Cleaning and summary statistics for daily fitness-tracker activity exports.
//!
//! Two CSV exports are loaded, concatenated and collapsed to one record per
//! `(user id, date)` by summing duplicate rows. The cleaned table feeds a
//! data-quality check and a report of grouped statistics.

pub mod combine;
pub mod error;
pub mod features;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod record;
pub mod report;
