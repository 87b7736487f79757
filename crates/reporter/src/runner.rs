//! Report run: load records, filter, aggregate, render.

use chrono::{DateTime, Utc};
use domain::models::{PassengerRecord, PassengerReportSummary};
use domain::services::{records_to_csv, records_until_hour, to_json, ReportFormat, ReportService};
use domain::ReportError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::config::{Config, ReportConfig};

/// Report run errors.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid record #{index} ({id}): {message}")]
    InvalidRecord {
        index: usize,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Rendered report body for JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerReport {
    pub generated_at: DateTime<Utc>,
    pub source_records: usize,
    pub matched_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_hour: Option<u8>,
    pub summary: PassengerReportSummary,
}

/// Output of [`build_report`]: the summary plus the records behind it.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: PassengerReport,
    pub records: Vec<PassengerRecord>,
}

/// Reads and validates a JSON array of passenger records.
///
/// The whole extract is rejected at the first invalid record.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<PassengerRecord>, RunError> {
    let content = fs::read_to_string(path)?;
    let records: Vec<PassengerRecord> = serde_json::from_str(&content)?;

    for (index, record) in records.iter().enumerate() {
        if let Err(e) = record.validate() {
            warn!(
                index = index,
                record_id = %record.id,
                error = %e,
                "Rejected passenger record"
            );
            return Err(RunError::InvalidRecord {
                index,
                id: record.id.clone(),
                message: e.to_string(),
            });
        }
    }

    info!(records = records.len(), "Loaded passenger records");
    Ok(records)
}

/// Applies the configured filters and hour cut-off, then summarizes.
#[instrument(skip_all, fields(records = records.len(), filters = config.filters.len()))]
pub fn build_report<S>(
    service: &S,
    records: &[PassengerRecord],
    config: &ReportConfig,
) -> Result<ReportOutcome, RunError>
where
    S: ReportService + ?Sized,
{
    let mut matched = service.filter_records(records, &config.filters)?;
    if let Some(hour) = config.until_hour {
        matched = records_until_hour(&matched, hour);
        debug!(hour = hour, remaining = matched.len(), "Applied hour cut-off");
    }

    let report = PassengerReport {
        generated_at: Utc::now(),
        source_records: records.len(),
        matched_records: matched.len(),
        until_hour: config.until_hour,
        summary: service.summarize(&matched),
    };

    Ok(ReportOutcome {
        report,
        records: matched,
    })
}

/// Renders the JSON summary or the CSV export of the matched records.
pub fn render(outcome: &ReportOutcome, format: ReportFormat) -> Result<String, RunError> {
    let content = match format {
        ReportFormat::Json => to_json(&outcome.report)?,
        ReportFormat::Csv => records_to_csv(&outcome.records),
    };
    Ok(content)
}

/// Writes content to a file, or stdout when no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), RunError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(path)?;
            file.write_all(content.as_bytes())?;
            info!(path = %path.display(), bytes = content.len(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Runs one report end to end.
#[instrument(skip_all, fields(format = %config.output.format))]
pub fn run<S>(config: &Config, service: &S) -> Result<PassengerReport, RunError>
where
    S: ReportService + ?Sized,
{
    let records = load_records(Path::new(&config.input.records_path))?;
    let outcome = build_report(service, &records, &config.report)?;

    let format = config.output.report_format();
    let content = render(&outcome, format)?;
    write_output(&content, config.output.path.as_deref())?;

    Ok(outcome.report)
}
