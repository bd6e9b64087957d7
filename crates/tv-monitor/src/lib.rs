//! tv-monitor: samples from the hardware monitor's CSV log.
//!
//! The monitoring tool appends one row per poll to a CSV file in its log
//! directory. We locate the newest log, read its header and last row, and
//! pull the temperature and clock columns out by name.

pub mod discover;
pub mod error;
pub mod source;
pub mod tail;

pub use discover::newest_log;
pub use error::{MonitorError, MonitorResult};
pub use source::{LogSnapshot, LogSource, MonitorConfig};
pub use tail::{LastRow, read_last_row};
