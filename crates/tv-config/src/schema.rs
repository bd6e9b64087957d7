//! Configuration schema definitions.
//!
//! Every section falls back to the deployed defaults, so a file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThermovoltConfig {
    pub version: u32,
    pub controller: ControllerDef,
    pub actuator: ActuatorDef,
    pub monitor: MonitorDef,
    pub poll: PollDef,
}

impl Default for ThermovoltConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            controller: ControllerDef::default(),
            actuator: ActuatorDef::default(),
            monitor: MonitorDef::default(),
            poll: PollDef::default(),
        }
    }
}

/// Voltages in centivolts, temperatures in whole degrees Celsius.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerDef {
    pub min_volt: i32,
    pub max_volt: i32,
    pub min_temp: i32,
    pub max_temp: i32,
    pub clocks_max_mhz: i32,
    pub throttling_factor_pct: i32,
    pub up_step: i32,
    pub down_step: i32,
    pub stay_high_min_duration: i32,
}

impl Default for ControllerDef {
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

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParityDef {
    #[default]
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActuatorDef {
    /// Serial ports to try, in order.
    pub ports: Vec<String>,
    pub slave_address: u8,
    pub probe_register: u16,
    pub voltage_register: u16,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: ParityDef,
    pub stop_bits: u8,
    pub timeout_s: f64,
    pub retry_pause_s: f64,
}

impl Default for ActuatorDef {
    fn default() -> Self {
        Self {
            ports: ["COM7", "COM1", "COM2", "COM4", "COM4", "COM5", "COM6", "COM8", "COM9"]
                .into_iter()
                .map(String::from)
                .collect(),
            slave_address: 1,
            probe_register: 2,
            voltage_register: 0,
            baud_rate: 9600,
            data_bits: 8,
            parity: ParityDef::None,
            stop_bits: 1,
            timeout_s: 2.0,
            retry_pause_s: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorDef {
    pub log_dir: PathBuf,
    pub extension: String,
    pub temperature_column: String,
    pub clock_column: String,
    /// Oldest acceptable log modification age; `null` disables the check.
    pub max_age_s: Option<f64>,
}

impl Default for MonitorDef {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("c:/HWiNFO"),
            extension: "CSV".to_string(),
            temperature_column: "CPU Package [°C]".to_string(),
            clock_column: "Core Clocks (avg) [MHz]".to_string(),
            max_age_s: Some(10.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollDef {
    pub interval_s: f64,
}

impl Default for PollDef {
    fn default() -> Self {
        Self { interval_s: 1.0 }
    }
}
