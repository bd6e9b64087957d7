//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control system operations.
///
/// The control loop only distinguishes the two transient variants; the
/// underlying cause is carried as text for reporting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// No valid, fresh sample could be read this cycle.
    #[error("Sample unavailable: {reason}")]
    SampleUnavailable { reason: String },

    /// The actuator rejected or failed to acknowledge a write.
    #[error("Actuator write failed: {reason}")]
    WriteError { reason: String },

    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl ControlError {
    pub fn sample_unavailable(reason: impl ToString) -> Self {
        Self::SampleUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn write_error(reason: impl ToString) -> Self {
        Self::WriteError {
            reason: reason.to_string(),
        }
    }

    /// Whether the loop should skip the rest of the cycle and try again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::SampleUnavailable { .. } | Self::WriteError { .. }
        )
    }
}

impl From<tv_core::TvError> for ControlError {
    fn from(err: tv_core::TvError) -> Self {
        match err {
            tv_core::TvError::InvalidArg { what } | tv_core::TvError::OutOfRange { what, .. } => {
                ControlError::InvalidArg { what }
            }
        }
    }
}
