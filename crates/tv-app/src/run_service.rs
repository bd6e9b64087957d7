//! Building the production loop and the one-shot diagnostics.

use serde::Serialize;
use std::path::PathBuf;

use tv_config::ThermovoltConfig;
use tv_controls::ControllerState;
use tv_link::{ActuatorLink, SerialOpener};
use tv_monitor::LogSource;

use crate::assemble::{Runtime, assemble};
use crate::control_loop::ControlLoop;
use crate::error::AppResult;
use crate::report::CycleReport;

/// Loop wired to the monitor's CSV log and the serial regulator.
pub type ProductionLoop = ControlLoop<LogSource, ActuatorLink<SerialOpener>>;

pub fn build_loop(config: &ThermovoltConfig) -> AppResult<ProductionLoop> {
    let Runtime {
        controller,
        link,
        monitor,
        sample,
    } = assemble(config)?;
    Ok(ControlLoop::new(
        controller,
        LogSource::new(monitor),
        ActuatorLink::new(SerialOpener, link),
        sample,
    ))
}

/// Make a single pass over the configured ports.
///
/// Returns the endpoint that answered the probe read.
pub fn probe_link(config: &ThermovoltConfig) -> AppResult<String> {
    let runtime = assemble(config)?;
    let mut link = ActuatorLink::new(SerialOpener, runtime.link);
    let endpoint = link.connect_once()?.to_string();
    link.disconnect();
    Ok(endpoint)
}

/// The current log sample and what the controller would do with it from rest.
#[derive(Debug, Clone, Serialize)]
pub struct SamplePreview {
    pub path: PathBuf,
    pub modified: String,
    pub report: CycleReport,
}

pub fn preview_sample(config: &ThermovoltConfig) -> AppResult<SamplePreview> {
    let runtime = assemble(config)?;
    let snapshot = LogSource::new(runtime.monitor).snapshot()?;
    let (state, target) = runtime
        .controller
        .step(&snapshot.sample, &ControllerState::default());
    Ok(SamplePreview {
        path: snapshot.path,
        modified: snapshot.modified.to_rfc3339(),
        report: CycleReport::new(0, &runtime.controller, &snapshot.sample, &state, target),
    })
}
