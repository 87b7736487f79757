//! Report export.
//!
//! Renders filtered records as CSV for spreadsheet tools, and any report
//! value as pretty JSON.

use serde::Serialize;

use crate::errors::ReportError;
use crate::models::{PassengerRecord, RecordField};

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: char = '\u{FEFF}';

/// Report format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "csv" => ReportFormat::Csv,
            _ => ReportFormat::Json, // Default to JSON
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Serialize data to JSON.
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String, ReportError> {
    serde_json::to_string_pretty(data).map_err(ReportError::from)
}

/// Convert records to CSV.
///
/// The header carries the camelCase field names. Every value is quoted, and
/// absent optional values are written as `N/A`.
pub fn records_to_csv(records: &[PassengerRecord]) -> String {
    let mut csv = String::new();
    csv.push(UTF8_BOM);

    let header: Vec<&str> = RecordField::ALL.iter().map(|f| f.as_str()).collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    for record in records {
        let row: Vec<String> = RecordField::ALL
            .iter()
            .map(|field| quote(&field.value_of(record).to_string()))
            .collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
