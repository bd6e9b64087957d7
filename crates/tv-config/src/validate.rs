//! Configuration validation logic.

use crate::schema::{ActuatorDef, ControllerDef, MonitorDef, PollDef, ThermovoltConfig};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty value: {field}")]
    Empty { field: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive_seconds(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be a positive number of seconds"))
    }
}

pub fn validate_config(config: &ThermovoltConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > crate::schema::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    validate_controller(&config.controller)?;
    validate_actuator(&config.actuator)?;
    validate_monitor(&config.monitor)?;
    validate_poll(&config.poll)?;
    Ok(())
}

fn validate_controller(c: &ControllerDef) -> Result<(), ValidationError> {
    if c.min_volt <= 0 {
        return Err(invalid(
            "controller.min_volt",
            c.min_volt,
            "must be positive; 0 is reserved for off",
        ));
    }
    if c.max_volt <= c.min_volt {
        return Err(invalid(
            "controller.max_volt",
            c.max_volt,
            "must be greater than min_volt",
        ));
    }
    if c.max_volt > u16::MAX as i32 {
        return Err(invalid(
            "controller.max_volt",
            c.max_volt,
            "must fit in a 16-bit register",
        ));
    }
    for (field, value) in [("controller.min_temp", c.min_temp), ("controller.max_temp", c.max_temp)] {
        if !(-273..=1000).contains(&value) {
            return Err(invalid(field, value, "must be within -273..=1000"));
        }
    }
    if c.max_temp <= c.min_temp {
        return Err(invalid(
            "controller.max_temp",
            c.max_temp,
            "must be greater than min_temp",
        ));
    }
    if c.clocks_max_mhz <= 0 {
        return Err(invalid(
            "controller.clocks_max_mhz",
            c.clocks_max_mhz,
            "must be positive",
        ));
    }
    if !(0..=100).contains(&c.throttling_factor_pct) {
        return Err(invalid(
            "controller.throttling_factor_pct",
            c.throttling_factor_pct,
            "must be within 0..=100",
        ));
    }
    for (field, value) in [("controller.up_step", c.up_step), ("controller.down_step", c.down_step)] {
        if !(1..=c.max_volt).contains(&value) {
            return Err(invalid(field, value, "must be within 1..=max_volt"));
        }
    }
    if !(0..=100_000).contains(&c.stay_high_min_duration) {
        return Err(invalid(
            "controller.stay_high_min_duration",
            c.stay_high_min_duration,
            "must be within 0..=100000",
        ));
    }
    Ok(())
}

fn validate_actuator(a: &ActuatorDef) -> Result<(), ValidationError> {
    if a.ports.is_empty() {
        return Err(ValidationError::Empty {
            field: "actuator.ports".to_string(),
        });
    }
    if let Some(blank) = a.ports.iter().find(|p| p.trim().is_empty()) {
        return Err(invalid("actuator.ports", blank, "port names must not be blank"));
    }
    if !(1..=247).contains(&a.slave_address) {
        return Err(invalid(
            "actuator.slave_address",
            a.slave_address,
            "must be within 1..=247",
        ));
    }
    if a.baud_rate == 0 {
        return Err(invalid("actuator.baud_rate", a.baud_rate, "must be positive"));
    }
    if !(5..=8).contains(&a.data_bits) {
        return Err(invalid(
            "actuator.data_bits",
            a.data_bits,
            "must be within 5..=8",
        ));
    }
    if !matches!(a.stop_bits, 1 | 2) {
        return Err(invalid("actuator.stop_bits", a.stop_bits, "must be 1 or 2"));
    }
    positive_seconds("actuator.timeout_s", a.timeout_s)?;
    positive_seconds("actuator.retry_pause_s", a.retry_pause_s)?;
    Ok(())
}

fn validate_monitor(m: &MonitorDef) -> Result<(), ValidationError> {
    if m.log_dir.as_os_str().is_empty() {
        return Err(ValidationError::Empty {
            field: "monitor.log_dir".to_string(),
        });
    }
    for (field, value) in [
        ("monitor.extension", &m.extension),
        ("monitor.temperature_column", &m.temperature_column),
        ("monitor.clock_column", &m.clock_column),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: field.to_string(),
            });
        }
    }
    if m.temperature_column == m.clock_column {
        return Err(invalid(
            "monitor.clock_column",
            &m.clock_column,
            "must differ from temperature_column",
        ));
    }
    if let Some(age) = m.max_age_s {
        positive_seconds("monitor.max_age_s", age)?;
    }
    Ok(())
}

fn validate_poll(p: &PollDef) -> Result<(), ValidationError> {
    positive_seconds("poll.interval_s", p.interval_s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_config(&ThermovoltConfig::default()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let config = ThermovoltConfig {
            version: 99,
            ..ThermovoltConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn rejects_inverted_voltage_bounds() {
        let mut config = ThermovoltConfig::default();
        config.controller.max_volt = 400;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("controller.max_volt"));
    }

    #[test]
    fn rejects_steps_and_temperatures_that_overflow_the_controller() {
        let mut config = ThermovoltConfig::default();
        config.controller.up_step = i32::MAX;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("controller.up_step"));

        let mut config = ThermovoltConfig::default();
        config.controller.down_step = 1201;
        assert!(validate_config(&config).is_err());

        let mut config = ThermovoltConfig::default();
        config.controller.min_temp = i32::MIN;
        config.controller.max_temp = i32::MAX;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("controller.min_temp"));
    }

    #[test]
    fn rejects_zero_min_volt() {
        let mut config = ThermovoltConfig::default();
        config.controller.min_volt = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_empty_port_list() {
        let mut config = ThermovoltConfig::default();
        config.actuator.ports.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn rejects_broadcast_address() {
        let mut config = ThermovoltConfig::default();
        config.actuator.slave_address = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_positive_intervals() {
        let mut config = ThermovoltConfig::default();
        config.poll.interval_s = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = ThermovoltConfig::default();
        config.actuator.timeout_s = f64::NAN;
        assert!(validate_config(&config).is_err());

        let mut config = ThermovoltConfig::default();
        config.monitor.max_age_s = Some(-1.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_same_column_twice() {
        let mut config = ThermovoltConfig::default();
        config.monitor.clock_column = config.monitor.temperature_column.clone();
        assert!(validate_config(&config).is_err());
    }
}
