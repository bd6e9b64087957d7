//! Error types for the actuator link.

use thiserror::Error;
use tv_controls::ControlError;

pub type LinkResult<T> = Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to open {endpoint}: {reason}")]
    Open { endpoint: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame rejected by the codec: bad CRC, broken frame or a Modbus
    /// exception reply from the slave.
    #[error("Modbus error: {0}")]
    Modbus(rmodbus::ErrorKind),

    #[error("Unexpected response: {what}")]
    UnexpectedResponse { what: String },

    #[error("No endpoint answered ({attempts} tried)")]
    ConnectExhausted { attempts: usize },

    #[error("Not connected")]
    NotConnected,

    #[error("Value error: {0}")]
    Value(#[from] tv_core::TvError),
}

impl LinkError {
    pub fn unexpected(what: impl Into<String>) -> Self {
        Self::UnexpectedResponse { what: what.into() }
    }
}

impl From<rmodbus::ErrorKind> for LinkError {
    fn from(err: rmodbus::ErrorKind) -> Self {
        Self::Modbus(err)
    }
}

impl From<LinkError> for ControlError {
    fn from(err: LinkError) -> Self {
        ControlError::write_error(err)
    }
}
