//! The polling control loop.
//!
//! Each cycle reads one sample, advances the controller and writes the new
//! voltage. A cycle without a sample is skipped and leaves the controller
//! state as it was. A failed write keeps the stepped state and reconnects
//! before anything else is written.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use tv_controls::{
    Actuator, ControllerState, SampleConfig, SampleSource, Sleeper, ThreadSleeper,
    VoltageController,
};

use crate::report::CycleReport;

/// Result of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The new voltage was written.
    Applied(CycleReport),
    /// No sample this cycle; nothing was stepped or written.
    Skipped { cycle: u64, reason: String },
    /// The controller stepped but the write failed.
    WriteFailed { report: CycleReport, reason: String },
}

impl CycleOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Applied(report) | Self::WriteFailed { report, .. } => Some(report),
            Self::Skipped { .. } => None,
        }
    }

    /// Status line for the console.
    pub fn status_line(&self) -> String {
        match self {
            Self::Applied(report) => report.status_line(),
            Self::Skipped { reason, .. } => format!("skipped: {reason}"),
            Self::WriteFailed { report, reason } => {
                format!("{}  write failed: {reason}", report.status_line())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStats {
    pub cycles: u64,
    pub applied: u64,
    pub skipped: u64,
    pub write_failures: u64,
}

pub struct ControlLoop<S, A, Z = ThreadSleeper> {
    controller: VoltageController,
    source: S,
    actuator: A,
    sleeper: Z,
    period: Duration,
    state: ControllerState,
    stats: LoopStats,
}

impl<S: SampleSource, A: Actuator> ControlLoop<S, A, ThreadSleeper> {
    pub fn new(controller: VoltageController, source: S, actuator: A, sample: SampleConfig) -> Self {
        Self::with_sleeper(controller, source, actuator, ThreadSleeper, sample)
    }
}

impl<S: SampleSource, A: Actuator, Z: Sleeper> ControlLoop<S, A, Z> {
    pub fn with_sleeper(
        controller: VoltageController,
        source: S,
        actuator: A,
        sleeper: Z,
        sample: SampleConfig,
    ) -> Self {
        Self {
            controller,
            source,
            actuator,
            sleeper,
            period: sample.period(),
            state: ControllerState::default(),
            stats: LoopStats::default(),
        }
    }

    pub fn controller(&self) -> &VoltageController {
        &self.controller
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Block until the actuator is connected.
    pub fn start(&mut self) {
        if !self.actuator.is_connected() {
            info!("connecting to regulator");
            self.actuator.connect();
        }
    }

    /// Run one sample, step, write cycle.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.start();
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;

        let sample = match self.source.latest_sample() {
            Ok(sample) => sample,
            Err(err) => {
                self.stats.skipped += 1;
                warn!(cycle, error = %err, "no sample, skipping cycle");
                return CycleOutcome::Skipped {
                    cycle,
                    reason: err.to_string(),
                };
            }
        };

        let (state, target) = self.controller.step(&sample, &self.state);
        self.state = state;
        let report = CycleReport::new(cycle, &self.controller, &sample, &state, target);

        match self.actuator.apply_voltage(state.voltage) {
            Ok(()) => {
                self.stats.applied += 1;
                debug!(cycle, voltage = state.voltage, target, "voltage applied");
                CycleOutcome::Applied(report)
            }
            Err(err) => {
                self.stats.write_failures += 1;
                warn!(cycle, voltage = state.voltage, error = %err, "write failed, reconnecting");
                self.actuator.connect();
                CycleOutcome::WriteFailed {
                    report,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Run cycles one poll period apart, handing each outcome to `observe`.
    ///
    /// Runs forever when `limit` is `None`.
    pub fn run<F>(&mut self, limit: Option<u64>, mut observe: F) -> LoopStats
    where
        F: FnMut(&CycleOutcome),
    {
        if limit == Some(0) {
            return self.stats.clone();
        }
        self.start();
        let mut done: u64 = 0;
        loop {
            let outcome = self.run_cycle();
            observe(&outcome);
            done += 1;
            if limit.is_some_and(|n| done >= n) {
                return self.stats.clone();
            }
            self.sleeper.sleep(self.period);
        }
    }
}
