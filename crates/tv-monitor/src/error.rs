//! Error types for log sampling.

use std::path::PathBuf;
use tv_controls::ControlError;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error("Failed to read log directory: {path}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No *.{extension} log found in {dir}")]
    NoLogFile { dir: PathBuf, extension: String },

    #[error("Failed to read log file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Log file has no data rows: {path}")]
    Empty { path: PathBuf },

    #[error("Column not found: {column}")]
    MissingColumn { column: String },

    #[error("Last row has no value for column: {column}")]
    MissingValue { column: String },

    #[error("Cannot parse '{value}' in column {column}")]
    Parse { column: String, value: String },

    #[error("Log file is stale: {path} ({age_s:.1}s old, limit {limit_s:.1}s)")]
    Stale {
        path: PathBuf,
        age_s: f64,
        limit_s: f64,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Value error: {0}")]
    Value(#[from] tv_core::TvError),
}

impl From<MonitorError> for ControlError {
    fn from(err: MonitorError) -> Self {
        ControlError::sample_unavailable(err)
    }
}
