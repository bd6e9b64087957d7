//! Sensor samples and the trait that provides them.

use serde::{Deserialize, Serialize};
use tv_core::{Celsius, Megahertz};

use crate::error::ControlResult;

/// One measurement cycle's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// CPU package temperature, whole degrees.
    pub temperature: Celsius,
    /// Average core clock in MHz.
    pub clock_mhz: Megahertz,
}

impl Sample {
    pub fn new(temperature: Celsius, clock_mhz: Megahertz) -> Self {
        Self {
            temperature,
            clock_mhz,
        }
    }
}

/// Trait for types that can provide the latest sample.
///
/// Implemented by the monitor crate on top of the hardware monitor's log, and
/// by test doubles.
pub trait SampleSource {
    /// Read the most recent sample.
    ///
    /// Fails with [`ControlError::SampleUnavailable`](crate::ControlError::SampleUnavailable)
    /// when no valid, fresh record can be found.
    fn latest_sample(&mut self) -> ControlResult<Sample>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn latest_sample(&mut self) -> ControlResult<Sample> {
        (**self).latest_sample()
    }
}
