//! Domain error types.

use thiserror::Error;

/// Errors surfaced by the reporting layer.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown filter key: {0}")]
    InvalidFilterKey(String),

    #[error("Invalid value for filter '{field}': {reason}")]
    InvalidFilterValue { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidFilterValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
