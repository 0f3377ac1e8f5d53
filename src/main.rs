//! CLI entry point for the activity report.
//!
//! Provides subcommands for the full cleaning and reporting run, the
//! duplicates view on its own, and a standalone data-quality check.

use activity_eda::output::{print_json, write_cleaned, write_duplicates, write_json};
use activity_eda::pipeline;
use activity_eda::quality;
use activity_eda::report::distribution::DEFAULT_BINS;
use activity_eda::report::{ReportOptions, build_report};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "activity_eda")]
#[command(about = "Clean and summarise daily fitness-tracker activity exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean both exports and write the table, quality check and report
    Run {
        /// First daily activity CSV
        #[arg(value_name = "FIRST_CSV")]
        first: PathBuf,

        /// Second daily activity CSV
        #[arg(value_name = "SECOND_CSV")]
        second: PathBuf,

        /// Directory to write artifacts into
        #[arg(short, long, default_value = "report")]
        output_dir: PathBuf,

        /// Gzip compress the cleaned CSV
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Number of histogram bins per measure
        #[arg(short, long, default_value_t = DEFAULT_BINS)]
        bins: usize,
    },
    /// Write the rows whose (user, date) key occurs more than once
    Duplicates {
        #[arg(value_name = "FIRST_CSV")]
        first: PathBuf,

        #[arg(value_name = "SECOND_CSV")]
        second: PathBuf,

        /// CSV file to write the duplicate rows to
        #[arg(short, long, default_value = "duplicates.csv")]
        output: PathBuf,
    },
    /// Log the data-quality report for the cleaned table
    Quality {
        #[arg(value_name = "FIRST_CSV")]
        first: PathBuf,

        #[arg(value_name = "SECOND_CSV")]
        second: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            first,
            second,
            output_dir,
            gzip,
            bins,
        } => {
            let options = ReportOptions {
                histogram_bins: bins,
            };
            run(&first, &second, &output_dir, gzip, &options)?;
        }
        Commands::Duplicates {
            first,
            second,
            output,
        } => {
            let table = pipeline::run(&first, &second)?;
            write_duplicates(&output, table.duplicates())?;
        }
        Commands::Quality { first, second } => {
            let table = pipeline::run(&first, &second)?;
            let report = quality::check(table.records(), table.anomalies());
            print_json(&report)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/activity_eda.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("activity_eda.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

/// Full run: clean, check, report, then write every artifact.
///
/// Nothing is written unless loading and cleaning both succeed.
#[tracing::instrument(skip(options), fields(first = %first.display(), second = %second.display()))]
fn run(
    first: &Path,
    second: &Path,
    output_dir: &Path,
    gzip: bool,
    options: &ReportOptions,
) -> Result<()> {
    let table = pipeline::run(first, second)?;
    let quality = quality::check(table.records(), table.anomalies());
    let report = build_report(table.records(), options);

    if quality.duplicate_keys_remaining {
        warn!(
            count = quality.duplicate_key_count,
            "Duplicate keys remain after cleaning"
        );
    }

    std::fs::create_dir_all(output_dir)?;

    let cleaned_name = if gzip { "cleaned.csv.gz" } else { "cleaned.csv" };
    write_cleaned(&output_dir.join(cleaned_name), table.records(), gzip)?;
    write_duplicates(&output_dir.join("duplicates.csv"), table.duplicates())?;
    write_json(&output_dir.join("quality.json"), &quality)?;
    write_json(&output_dir.join("report.json"), &report)?;

    for line in &report.highlights {
        info!("{line}");
    }

    info!(
        raw_rows = table.raw_row_count(),
        records = table.records().len(),
        merged_groups = table.merged_groups(),
        warnings = quality.warnings.len(),
        output_dir = %output_dir.display(),
        "Finished activity report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_bins_default_matches_report_options() {
        let cli = Cli::try_parse_from(["activity_eda", "run", "a.csv", "b.csv"]).unwrap();

        match cli.command {
            Commands::Run { bins, .. } => {
                assert_eq!(bins, ReportOptions::default().histogram_bins);
            }
            _ => panic!("expected run subcommand"),
        }
    }
}
