//! Connection lifecycle for the voltage regulator.
//!
//! ```text
//! Disconnected --connect(ok)--> Connected --write(fail)--> Disconnected --> ...
//! ```
//!
//! `connect` walks the candidate endpoints in order, opening each with the
//! fixed serial settings and probing a known register. If the whole list
//! fails it pauses and starts over, forever: without the regulator there is
//! nothing useful for the controller to do. A failed write drops the
//! connection outright; cable pulls and regulator resets need a full
//! re-handshake anyway.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use tv_controls::{Actuator, ControlResult, Sleeper, ThreadSleeper};
use tv_core::{Centivolts, to_register};

use crate::client::RtuClient;
use crate::error::{LinkError, LinkResult};
use crate::port::{PortOpener, SerialSettings};

/// Link configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Endpoints to try, in order. Duplicates are tried again.
    pub candidates: Vec<String>,
    /// Modbus slave address of the regulator.
    pub slave: u8,
    /// Holding register read to verify a freshly opened link.
    pub probe_register: u16,
    /// Holding register the voltage is written to.
    pub voltage_register: u16,
    pub serial: SerialSettings,
    /// Pause after a full pass over `candidates` fails.
    pub retry_pause: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            candidates: ["COM7", "COM1", "COM2", "COM4", "COM4", "COM5", "COM6", "COM8", "COM9"]
                .into_iter()
                .map(String::from)
                .collect(),
            slave: 1,
            probe_register: 2,
            voltage_register: 0,
            serial: SerialSettings::default(),
            retry_pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Counters for operator visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    /// Successful connects.
    pub connects: u64,
    /// Individual endpoint attempts that failed to open or probe.
    pub failed_attempts: u64,
    /// Full passes over the candidate list that found nothing.
    pub exhausted_passes: u64,
    pub writes: u64,
    pub write_failures: u64,
}

/// A live, verified connection.
pub struct Connection<P> {
    endpoint: String,
    client: RtuClient<P>,
}

impl<P> Connection<P> {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Owns the (at most one) connection to the regulator.
pub struct ActuatorLink<O: PortOpener, S: Sleeper = ThreadSleeper> {
    opener: O,
    sleeper: S,
    config: LinkConfig,
    conn: Option<Connection<O::Port>>,
    stats: LinkStats,
}

impl<O: PortOpener> ActuatorLink<O, ThreadSleeper> {
    pub fn new(opener: O, config: LinkConfig) -> Self {
        Self::with_sleeper(opener, ThreadSleeper, config)
    }
}

impl<O: PortOpener, S: Sleeper> ActuatorLink<O, S> {
    pub fn with_sleeper(opener: O, sleeper: S, config: LinkConfig) -> Self {
        Self {
            opener,
            sleeper,
            config,
            conn: None,
            stats: LinkStats::default(),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn state(&self) -> LinkState {
        if self.conn.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    /// Endpoint of the live connection, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.conn.as_ref().map(Connection::endpoint)
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Drop the current connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            debug!(endpoint = %conn.endpoint, "closing connection");
        }
    }

    /// Connect, retrying the whole candidate list until an endpoint answers.
    ///
    /// Any existing connection is closed first.
    pub fn connect(&mut self) -> &mut Connection<O::Port> {
        self.disconnect();
        let mut pass: u64 = 0;
        loop {
            pass += 1;
            match self.connect_pass() {
                Ok(conn) => return self.conn.insert(conn),
                Err(err) => {
                    warn!(pass, error = %err, pause = ?self.config.retry_pause, "regulator not found, retrying");
                    self.sleeper.sleep(self.config.retry_pause);
                }
            }
        }
    }

    /// Single pass over the candidate list.
    ///
    /// Fails with [`LinkError::ConnectExhausted`] when no endpoint answers.
    pub fn connect_once(&mut self) -> LinkResult<&str> {
        self.disconnect();
        let conn = self.connect_pass()?;
        Ok(self.conn.insert(conn).endpoint())
    }

    /// Write the voltage register.
    ///
    /// Any failure drops the connection; call [`connect`](Self::connect)
    /// before writing again.
    pub fn write_voltage(&mut self, value: u16) -> LinkResult<()> {
        let register = self.config.voltage_register;
        let conn = self.conn.as_mut().ok_or(LinkError::NotConnected)?;
        match conn.client.write_register(register, value) {
            Ok(()) => {
                self.stats.writes += 1;
                Ok(())
            }
            Err(err) => {
                self.stats.write_failures += 1;
                warn!(endpoint = %conn.endpoint, value, error = %err, "write failed, dropping connection");
                self.conn = None;
                Err(err)
            }
        }
    }

    fn connect_pass(&mut self) -> LinkResult<Connection<O::Port>> {
        for endpoint in &self.config.candidates {
            let port = match self.opener.open(endpoint, &self.config.serial) {
                Ok(port) => port,
                Err(err) => {
                    self.stats.failed_attempts += 1;
                    warn!(endpoint = %endpoint, error = %err, "failed to connect");
                    continue;
                }
            };

            let mut client = RtuClient::new(port, self.config.slave, self.config.serial.baud_rate);
            match client.read_holding_register(self.config.probe_register) {
                Ok(value) => {
                    self.stats.connects += 1;
                    info!(endpoint = %endpoint, probe = value, "connected");
                    return Ok(Connection {
                        endpoint: endpoint.clone(),
                        client,
                    });
                }
                Err(err) => {
                    self.stats.failed_attempts += 1;
                    warn!(endpoint = %endpoint, error = %err, "probe failed");
                }
            }
        }
        self.stats.exhausted_passes += 1;
        Err(LinkError::ConnectExhausted {
            attempts: self.config.candidates.len(),
        })
    }
}

impl<O: PortOpener, S: Sleeper> Actuator for ActuatorLink<O, S> {
    fn connect(&mut self) {
        ActuatorLink::connect(self);
    }

    fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    fn apply_voltage(&mut self, voltage: Centivolts) -> ControlResult<()> {
        let value = to_register(voltage).map_err(LinkError::from)?;
        self.write_voltage(value)?;
        Ok(())
    }
}
