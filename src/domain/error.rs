//! Domain error types.
//!
//! Only transport and decompression failures are real errors. Malformed rows,
//! bad dates and non-numeric unit counts are resolved to defaults where they
//! are read and never surface here.

use chrono::NaiveDate;

/// Top-level error type for storefront-sales.
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date interval: {start} is after {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },

    #[error("failed to fetch report for {date}: {reason}")]
    Fetch { date: NaiveDate, reason: String },

    #[error("failed to decompress {path}: {reason}")]
    Decompress { path: String, reason: String },

    #[error("report store error at {path}: {reason}")]
    Store { path: String, reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SalesError> for std::process::ExitCode {
    fn from(err: &SalesError) -> Self {
        let code: u8 = match err {
            SalesError::Io(_) | SalesError::Store { .. } => 1,
            SalesError::ConfigParse { .. }
            | SalesError::ConfigMissing { .. }
            | SalesError::ConfigInvalid { .. }
            | SalesError::InvalidInterval { .. } => 2,
            SalesError::Fetch { .. } => 3,
            SalesError::Decompress { .. } => 4,
            SalesError::Cancelled => 130,
        };
        std::process::ExitCode::from(code)
    }
}
