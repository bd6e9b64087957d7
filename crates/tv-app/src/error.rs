//! Error types for the tv-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
///
/// Only startup paths (loading config, building the runtime, one-shot
/// commands) return these; once the loop runs, errors are reported per cycle.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Control error: {0}")]
    Control(#[from] tv_controls::ControlError),

    #[error("Actuator link error: {0}")]
    Link(String),

    #[error("Monitor error: {0}")]
    Monitor(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tv_config::ConfigError> for AppError {
    fn from(err: tv_config::ConfigError) -> Self {
        match err {
            tv_config::ConfigError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<tv_link::LinkError> for AppError {
    fn from(err: tv_link::LinkError) -> Self {
        AppError::Link(err.to_string())
    }
}

impl From<tv_monitor::MonitorError> for AppError {
    fn from(err: tv_monitor::MonitorError) -> Self {
        AppError::Monitor(err.to_string())
    }
}
