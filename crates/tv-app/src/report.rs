//! Per-cycle status reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

use tv_controls::{ControllerState, Direction, Sample, VoltageController};
use tv_core::{Celsius, Centivolts, as_volts, cv};

/// What one control cycle observed and commanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub temperature: Celsius,
    /// Clock speed as a truncated percentage of the rated maximum.
    pub clock_pct: i32,
    pub throttled: bool,
    /// Commanded voltage after this cycle, in centivolts.
    pub voltage: Centivolts,
    /// Unclamped target the cycle stepped towards, in centivolts.
    pub target: Centivolts,
    pub direction: Direction,
    pub hold_countdown: u32,
}

impl CycleReport {
    pub fn new(
        cycle: u64,
        controller: &VoltageController,
        sample: &Sample,
        state: &ControllerState,
        target: Centivolts,
    ) -> Self {
        Self {
            cycle,
            temperature: sample.temperature,
            clock_pct: controller.clock_pct(sample.clock_mhz),
            throttled: controller.is_throttled(sample),
            voltage: state.voltage,
            target,
            direction: Direction::of(target, state.voltage),
            hold_countdown: state.hold_countdown,
        }
    }

    /// One-line operator status, e.g.
    /// `CPU:  85°C  Clocks: 100% |  5.50V (↑  7.80V   8)`.
    pub fn status_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU: {:>3}°C  Clocks: {:>3}% | {:>5.2}V ({} {:>5.2}V {:>3})",
            self.temperature,
            self.clock_pct,
            as_volts(cv(self.voltage)),
            self.direction.arrow(),
            as_volts(cv(self.target)),
            self.hold_countdown,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_controls::ControllerConfig;

    #[test]
    fn status_line_layout() {
        let controller = VoltageController::new(ControllerConfig::default()).unwrap();
        let sample = Sample::new(85, 3890);
        let (state, target) = controller.step(&sample, &ControllerState::default());
        let report = CycleReport::new(1, &controller, &sample, &state, target);

        assert_eq!(report.voltage, 550);
        assert_eq!(report.target, 780);
        assert_eq!(report.direction, Direction::Up);
        assert_eq!(
            report.status_line(),
            format!("CPU:  85°C  Clocks: 100% |  5.50V (↑  7.80V {:>3})", state.hold_countdown)
        );
    }

    #[test]
    fn throttle_shows_only_in_the_report_fields() {
        let controller = VoltageController::new(ControllerConfig {
            throttling_factor_pct: 50,
            ..ControllerConfig::default()
        })
        .unwrap();
        let sample = Sample::new(60, 1000);
        let (state, target) = controller.step(&sample, &ControllerState::default());
        let report = CycleReport::new(7, &controller, &sample, &state, target);

        assert!(report.throttled);
        assert_eq!(report.target, 1200);
        assert!(report.status_line().ends_with(")"));
        assert!(!report.status_line().contains("throttled"));
    }

    #[test]
    fn serializes_direction_in_snake_case() {
        let report = CycleReport {
            cycle: 3,
            temperature: 70,
            clock_pct: 90,
            throttled: false,
            voltage: 0,
            target: 0,
            direction: Direction::Steady,
            hold_countdown: 0,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""direction":"steady""#));
    }
}
