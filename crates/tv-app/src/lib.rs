//! Application service layer for thermovolt.
//!
//! Wires configuration, the log sample source, the controller and the
//! actuator link into the polling loop, and renders what each cycle did.

pub mod assemble;
pub mod config_service;
pub mod control_loop;
pub mod error;
pub mod report;
pub mod run_service;

pub use assemble::{Runtime, assemble};
pub use config_service::{default_config_yaml, load_config, resolve_config, save_config};
pub use control_loop::{ControlLoop, CycleOutcome, LoopStats};
pub use error::{AppError, AppResult};
pub use report::CycleReport;
pub use run_service::{ProductionLoop, SamplePreview, build_loop, preview_sample, probe_link};
