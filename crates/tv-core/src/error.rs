use thiserror::Error;

pub type TvResult<T> = Result<T, TvError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TvError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range for {what}: {value} (expected {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
