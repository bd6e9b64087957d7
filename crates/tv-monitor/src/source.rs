//! [`SampleSource`] backed by the monitor's newest CSV log.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use tv_controls::{ControlResult, Sample, SampleSource};
use tv_core::truncate_reading;

use crate::discover::newest_log;
use crate::error::{MonitorError, MonitorResult};
use crate::tail::read_last_row;

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10);

/// Where the log lives and which columns to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub log_dir: PathBuf,
    /// Log file extension, matched case-insensitively.
    pub extension: String,
    pub temperature_column: String,
    pub clock_column: String,
    /// Reject logs not modified within this window. `None` accepts any age.
    /// The monitor appends a row every second or two, so the default
    /// allows a few missed writes before a stopped log is refused.
    pub max_age: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("c:/HWiNFO"),
            extension: "CSV".to_string(),
            temperature_column: "CPU Package [°C]".to_string(),
            clock_column: "Core Clocks (avg) [MHz]".to_string(),
            max_age: Some(DEFAULT_MAX_AGE),
        }
    }
}

/// One sample together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSnapshot {
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub sample: Sample,
}

/// Reads samples from the newest log in a directory.
#[derive(Debug, Clone)]
pub struct LogSource {
    config: MonitorConfig,
}

impl LogSource {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Locate the newest log and read its last row.
    pub fn snapshot(&self) -> MonitorResult<LogSnapshot> {
        self.snapshot_at(Utc::now())
    }

    /// As [`snapshot`](Self::snapshot), judging freshness against `now`.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> MonitorResult<LogSnapshot> {
        let path = newest_log(&self.config.log_dir, &self.config.extension)?;
        let modified = modified_time(&path)?;
        self.check_fresh(&path, modified, now)?;

        let row = read_last_row(&path)?;
        let temperature = truncate_reading(row.number(&self.config.temperature_column)?, "temperature")?;
        let clock_mhz = truncate_reading(row.number(&self.config.clock_column)?, "clock")?;

        debug!(path = %path.display(), temperature, clock_mhz, "sampled log");
        Ok(LogSnapshot {
            path,
            modified: modified.with_timezone(&Local),
            sample: Sample::new(temperature, clock_mhz),
        })
    }

    fn check_fresh(
        &self,
        path: &Path,
        modified: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> MonitorResult<()> {
        let Some(limit) = self.config.max_age else {
            return Ok(());
        };
        // A modification time in the future (clock skew) counts as fresh.
        if let Ok(age) = now.signed_duration_since(modified).to_std() {
            if age > limit {
                return Err(MonitorError::Stale {
                    path: path.to_path_buf(),
                    age_s: age.as_secs_f64(),
                    limit_s: limit.as_secs_f64(),
                });
            }
        }
        Ok(())
    }
}

impl SampleSource for LogSource {
    fn latest_sample(&mut self) -> ControlResult<Sample> {
        Ok(self.snapshot()?.sample)
    }
}

fn modified_time(path: &Path) -> MonitorResult<DateTime<Utc>> {
    let meta = std::fs::metadata(path).map_err(|e| MonitorError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let modified = meta.modified().map_err(|e| MonitorError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(DateTime::<Utc>::from(modified))
}
