//! Turning a validated configuration file into runtime components.

use std::time::Duration;

use tv_config::{ActuatorDef, ControllerDef, MonitorDef, ParityDef, PollDef, ThermovoltConfig};
use tv_controls::{ControllerConfig, SampleConfig, VoltageController};
use tv_link::{LinkConfig, Parity, SerialSettings};
use tv_monitor::MonitorConfig;

use crate::error::{AppError, AppResult};

/// Everything the control loop needs, built from one configuration.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub controller: VoltageController,
    pub link: LinkConfig,
    pub monitor: MonitorConfig,
    pub sample: SampleConfig,
}

/// Validate `config` and build its runtime components.
pub fn assemble(config: &ThermovoltConfig) -> AppResult<Runtime> {
    tv_config::validate_config(config).map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Runtime {
        controller: VoltageController::new(controller_config(&config.controller))?,
        link: link_config(&config.actuator)?,
        monitor: monitor_config(&config.monitor)?,
        sample: sample_config(&config.poll)?,
    })
}

pub fn controller_config(def: &ControllerDef) -> ControllerConfig {
    ControllerConfig {
        min_volt: def.min_volt,
        max_volt: def.max_volt,
        min_temp: def.min_temp,
        max_temp: def.max_temp,
        clocks_max_mhz: def.clocks_max_mhz,
        throttling_factor_pct: def.throttling_factor_pct,
        up_step: def.up_step,
        down_step: def.down_step,
        stay_high_min_duration: def.stay_high_min_duration,
    }
}

pub fn link_config(def: &ActuatorDef) -> AppResult<LinkConfig> {
    Ok(LinkConfig {
        candidates: def.ports.clone(),
        slave: def.slave_address,
        probe_register: def.probe_register,
        voltage_register: def.voltage_register,
        serial: SerialSettings {
            baud_rate: def.baud_rate,
            data_bits: def.data_bits,
            parity: match def.parity {
                ParityDef::None => Parity::None,
                ParityDef::Even => Parity::Even,
                ParityDef::Odd => Parity::Odd,
            },
            stop_bits: def.stop_bits,
            timeout: seconds("actuator.timeout_s", def.timeout_s)?,
        },
        retry_pause: seconds("actuator.retry_pause_s", def.retry_pause_s)?,
    })
}

pub fn monitor_config(def: &MonitorDef) -> AppResult<MonitorConfig> {
    let max_age = def
        .max_age_s
        .map(|s| seconds("monitor.max_age_s", s))
        .transpose()?;
    Ok(MonitorConfig {
        log_dir: def.log_dir.clone(),
        extension: def.extension.clone(),
        temperature_column: def.temperature_column.clone(),
        clock_column: def.clock_column.clone(),
        max_age,
    })
}

pub fn sample_config(def: &PollDef) -> AppResult<SampleConfig> {
    Ok(SampleConfig::new(def.interval_s)?)
}

fn seconds(field: &str, value: f64) -> AppResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| AppError::InvalidInput(format!("{field} = {value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_assemble_to_deployed_settings() {
        let runtime = assemble(&ThermovoltConfig::default()).unwrap();
        assert_eq!(runtime.controller.config(), &ControllerConfig::default());
        assert_eq!(runtime.link, LinkConfig::default());
        assert_eq!(runtime.monitor, MonitorConfig::default());
        assert_eq!(runtime.sample.period(), Duration::from_secs(1));
    }

    #[test]
    fn fractional_seconds_carry_through() {
        let mut config = ThermovoltConfig::default();
        config.actuator.timeout_s = 0.25;
        config.actuator.parity = ParityDef::Even;
        config.monitor.max_age_s = Some(15.0);
        config.poll.interval_s = 0.5;

        let runtime = assemble(&config).unwrap();
        assert_eq!(runtime.link.serial.timeout, Duration::from_millis(250));
        assert_eq!(runtime.link.serial.parity, Parity::Even);
        assert_eq!(runtime.monitor.max_age, Some(Duration::from_secs(15)));
        assert_eq!(runtime.sample.period(), Duration::from_millis(500));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ThermovoltConfig::default();
        config.controller.max_temp = config.controller.min_temp;
        assert!(matches!(assemble(&config), Err(AppError::Validation(_))));
    }

    #[test]
    fn negative_durations_are_rejected_without_validation() {
        assert!(matches!(
            seconds("poll.interval_s", -1.0),
            Err(AppError::InvalidInput(_))
        ));
    }
}
