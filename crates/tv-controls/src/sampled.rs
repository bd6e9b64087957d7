//! Sampled execution primitives for the control loop.
//!
//! The controller runs once per sample period. Between samples the last
//! commanded voltage is held by the regulator itself, so all we need here is
//! the period and a way to wait it out.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ControlError, ControlResult};

/// Sample configuration for the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sample period in seconds.
    pub dt: f64,
}

impl SampleConfig {
    /// Create a new sample configuration.
    ///
    /// # Arguments
    ///
    /// * `dt` - Sample period in seconds (must be positive and finite)
    pub fn new(dt: f64) -> ControlResult<Self> {
        if !(dt.is_finite() && dt > 0.0) || Duration::try_from_secs_f64(dt).is_err() {
            return Err(ControlError::InvalidArg {
                what: "sample period must be positive",
            });
        }
        Ok(Self { dt })
    }

    /// Sample period as a [`Duration`].
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.dt)
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { dt: 1.0 }
    }
}

/// Something that can suspend the control thread.
///
/// The loop and the reconnect procedure wait through this trait so tests can
/// count pauses instead of sleeping.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Box<S> {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_creation() {
        let config = SampleConfig::new(0.5).unwrap();
        assert_eq!(config.dt, 0.5);
        assert_eq!(config.period(), Duration::from_millis(500));
    }

    #[test]
    fn default_is_one_hertz() {
        assert_eq!(SampleConfig::default().period(), Duration::from_secs(1));
    }

    #[test]
    fn invalid_periods_rejected() {
        assert!(SampleConfig::new(0.0).is_err());
        assert!(SampleConfig::new(-1.0).is_err());
        assert!(SampleConfig::new(f64::NAN).is_err());
        assert!(SampleConfig::new(1e300).is_err());
    }
}
