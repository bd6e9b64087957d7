//! Control primitives for thermovolt.
//!
//! This crate holds the part of the system that decides what voltage to
//! command. It is free of I/O: samples come in through [`SampleSource`], the
//! decision is made by [`VoltageController`], and the result leaves through
//! [`Actuator`].
//!
//! # Architecture
//!
//! - A [`Sample`] is one (temperature, clock) reading, valid for one cycle
//! - [`ControllerState`] is the only value that survives between cycles
//! - [`VoltageController::step`] is a pure function of sample and state
//! - The controller runs in sampled mode at the period in [`SampleConfig`]
//!
//! # Design Principles
//!
//! - **Integer arithmetic**: every division truncates, matching the register
//!   values the deployed controller has always written
//! - **Asymmetric rate limiting**: rises are immediate steps, falls wait out a
//!   hold timer proportional to how high the target sits
//! - **Transient errors only**: sampling and actuation errors are reported to
//!   the caller as [`ControlError`] and never poison the state

pub mod actuator;
pub mod controller;
pub mod error;
pub mod sample;
pub mod sampled;

pub use actuator::Actuator;
pub use controller::{ControllerConfig, ControllerState, Direction, VoltageController};
pub use error::{ControlError, ControlResult};
pub use sample::{Sample, SampleSource};
pub use sampled::{SampleConfig, Sleeper, ThreadSleeper};
