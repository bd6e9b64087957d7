//! Voltage controller.
//!
//! Maps a temperature/clock sample onto a target voltage and walks the
//! commanded voltage toward it:
//! - **Throttle override**: a clock at or below the throttling percentage forces
//!   the target to the maximum voltage
//! - **Piecewise-linear target**: off below `min_temp`, linear from
//!   `(min_temp, min_volt)` to `(max_temp, max_volt)`, flat above `max_temp`
//! - **Rate limiting**: one `up_step` per cycle upward, one `down_step` per
//!   cycle downward, and only once the hold timer has run out
//!
//! Zero is the distinguished "off" value. The commanded voltage is always 0 or
//! inside `[min_volt, max_volt]`.

use crate::error::{ControlError, ControlResult};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use tv_core::{Celsius, Centivolts, Megahertz, mul_div_trunc};

/// Temperatures a configuration may name, in degrees Celsius.
const TEMP_LIMITS: std::ops::RangeInclusive<Celsius> = -273..=1000;

/// Voltage controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Lowest non-zero voltage (centivolts).
    pub min_volt: Centivolts,
    /// Highest voltage (centivolts).
    pub max_volt: Centivolts,
    /// Temperature at which the voltage starts at `min_volt`.
    pub min_temp: Celsius,
    /// Temperature at and above which the target is `max_volt`.
    pub max_temp: Celsius,
    /// Clock speed that counts as 100%.
    pub clocks_max_mhz: Megahertz,
    /// Clock percentage at or below which the CPU is considered throttled.
    pub throttling_factor_pct: i32,
    /// Increment per cycle while rising.
    pub up_step: Centivolts,
    /// Decrement per cycle while falling.
    pub down_step: Centivolts,
    /// Scales the hold timer; `hold_for(max_volt) == 10 * stay_high_min_duration`.
    pub stay_high_min_duration: i32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_volt: 500,
            max_volt: 1200,
            min_temp: 75,
            max_temp: 100,
            clocks_max_mhz: 3890,
            throttling_factor_pct: 0,
            up_step: 50,
            down_step: 50,
            stay_high_min_duration: 2,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration for values the controller cannot work with.
    pub fn validate(&self) -> ControlResult<()> {
        if self.min_volt <= 0 {
            return Err(ControlError::InvalidArg {
                what: "min_volt must be positive",
            });
        }
        if self.min_volt >= self.max_volt {
            return Err(ControlError::InvalidArg {
                what: "min_volt must be less than max_volt",
            });
        }
        if self.max_volt > u16::MAX as i32 {
            return Err(ControlError::InvalidArg {
                what: "max_volt must fit in a 16-bit register",
            });
        }
        if !TEMP_LIMITS.contains(&self.min_temp) || !TEMP_LIMITS.contains(&self.max_temp) {
            return Err(ControlError::InvalidArg {
                what: "min_temp and max_temp must be within -273..=1000",
            });
        }
        if self.min_temp >= self.max_temp {
            return Err(ControlError::InvalidArg {
                what: "min_temp must be less than max_temp",
            });
        }
        if self.clocks_max_mhz <= 0 {
            return Err(ControlError::InvalidArg {
                what: "clocks_max_mhz must be positive",
            });
        }
        if !(0..=100).contains(&self.throttling_factor_pct) {
            return Err(ControlError::InvalidArg {
                what: "throttling_factor_pct must be within 0..=100",
            });
        }
        if self.up_step <= 0 || self.down_step <= 0 {
            return Err(ControlError::InvalidArg {
                what: "up_step and down_step must be positive",
            });
        }
        if self.up_step > self.max_volt || self.down_step > self.max_volt {
            return Err(ControlError::InvalidArg {
                what: "up_step and down_step must not exceed max_volt",
            });
        }
        if !(0..=100_000).contains(&self.stay_high_min_duration) {
            return Err(ControlError::InvalidArg {
                what: "stay_high_min_duration must be within 0..=100000",
            });
        }
        Ok(())
    }

    fn volt_range(&self) -> i32 {
        self.max_volt - self.min_volt
    }

    fn temp_range(&self) -> i32 {
        self.max_temp - self.min_temp
    }
}

/// State carried from one cycle to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Currently commanded voltage (centivolts), 0 when off.
    pub voltage: Centivolts,
    /// Cycles left before a decrease is allowed.
    pub hold_countdown: u32,
}

/// Direction the target lies in relative to the commanded voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Steady,
}

impl Direction {
    pub fn of(target: Centivolts, voltage: Centivolts) -> Self {
        use std::cmp::Ordering;
        match target.cmp(&voltage) {
            Ordering::Greater => Self::Up,
            Ordering::Less => Self::Down,
            Ordering::Equal => Self::Steady,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Steady => '→',
        }
    }
}

/// Hysteresis / rate-limited voltage controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoltageController {
    config: ControllerConfig,
}

impl VoltageController {
    /// Create a new controller from a validated configuration.
    pub fn new(config: ControllerConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Clock speed as a truncated percentage of `clocks_max_mhz`.
    pub fn clock_pct(&self, clock_mhz: Megahertz) -> i32 {
        mul_div_trunc(clock_mhz, 100, self.config.clocks_max_mhz).unwrap_or(i32::MAX)
    }

    pub fn is_throttled(&self, sample: &Sample) -> bool {
        self.clock_pct(sample.clock_mhz) <= self.config.throttling_factor_pct
    }

    /// Target voltage for a sample, before rate limiting.
    pub fn target_for(&self, sample: &Sample) -> Centivolts {
        let c = &self.config;
        if self.is_throttled(sample) {
            return c.max_volt;
        }
        if sample.temperature < c.min_temp {
            return 0;
        }
        let above = sample.temperature.min(c.max_temp) - c.min_temp;
        // Ranges are positive once validated.
        c.min_volt + mul_div_trunc(above, c.volt_range(), c.temp_range()).unwrap_or(0)
    }

    /// Number of cycles a level must be held before stepping down from it.
    pub fn hold_for(&self, voltage: Centivolts) -> u32 {
        let c = &self.config;
        if voltage < c.min_volt {
            return 0;
        }
        mul_div_trunc(
            voltage - c.min_volt,
            10 * c.stay_high_min_duration,
            c.volt_range(),
        )
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
    }

    /// Advance the controller by one cycle.
    ///
    /// # Returns
    ///
    /// Updated state and the target voltage the step was aimed at.
    pub fn step(&self, sample: &Sample, state: &ControllerState) -> (ControllerState, Centivolts) {
        let c = &self.config;
        let target = self.target_for(sample);

        let mut voltage = state.voltage;
        let hold_countdown;

        if target >= voltage {
            if target > voltage {
                voltage = voltage.max(c.min_volt).saturating_add(c.up_step);
            }
            hold_countdown = self.hold_for(target);
        } else if state.hold_countdown <= 1 {
            voltage = voltage.saturating_sub(c.down_step);
            hold_countdown = self.hold_for(target);
        } else {
            hold_countdown = state.hold_countdown - 1;
        }

        let new_state = ControllerState {
            voltage: self.clamp(voltage),
            hold_countdown,
        };
        (new_state, target)
    }

    /// Snap a voltage into `{0} ∪ [min_volt, max_volt]`.
    pub fn clamp(&self, voltage: Centivolts) -> Centivolts {
        if voltage < self.config.min_volt {
            0
        } else if voltage > self.config.max_volt {
            self.config.max_volt
        } else {
            voltage
        }
    }
}
