//! Serial transport parameters and port opening.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::time::Duration;

use crate::error::{LinkError, LinkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Fixed transport parameters applied to every candidate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialSettings {
    pub baud_rate: u32,
    /// 5..=8
    pub data_bits: u8,
    pub parity: Parity,
    /// 1 or 2
    pub stop_bits: u8,
    /// Per-operation read/write timeout.
    pub timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            timeout: Duration::from_secs(2),
        }
    }
}

/// Opens a byte stream to a named endpoint.
///
/// The production implementation is [`SerialOpener`]; tests substitute
/// in-memory ports.
pub trait PortOpener {
    type Port: Read + Write;

    fn open(&mut self, endpoint: &str, settings: &SerialSettings) -> LinkResult<Self::Port>;
}

/// Opens real serial ports through the `serialport` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialOpener;

impl PortOpener for SerialOpener {
    type Port = Box<dyn serialport::SerialPort>;

    fn open(&mut self, endpoint: &str, settings: &SerialSettings) -> LinkResult<Self::Port> {
        let open_err = |reason: String| LinkError::Open {
            endpoint: endpoint.to_string(),
            reason,
        };

        let data_bits = match settings.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => return Err(open_err(format!("unsupported data bits {other}"))),
        };
        let stop_bits = match settings.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => return Err(open_err(format!("unsupported stop bits {other}"))),
        };
        let parity = match settings.parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
        };

        let port = serialport::new(endpoint, settings.baud_rate)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .flow_control(serialport::FlowControl::None)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| open_err(e.to_string()))?;

        // Drop anything a previous session left in the driver buffers.
        if let Err(e) = port.clear(serialport::ClearBuffer::All) {
            tracing::debug!(endpoint, error = %e, "could not clear serial buffers");
        }
        Ok(port)
    }
}

/// Names of the serial ports present on this machine.
pub fn list_ports() -> LinkResult<Vec<String>> {
    let ports = serialport::available_ports().map_err(|e| LinkError::Open {
        endpoint: "<enumerate>".to_string(),
        reason: e.to_string(),
    })?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
