//! Actuator link for thermovolt.
//!
//! Talks Modbus RTU to the voltage regulator over a serial port:
//! - `client`: request/response exchange over any `Read + Write` port,
//!   with frames built and checked by `rmodbus`
//! - `port`: serial parameters and the opener that produces ports
//! - `link`: connection lifecycle with retry-forever reconnect

pub mod client;
pub mod error;
pub mod link;
pub mod port;

pub use client::RtuClient;
pub use error::{LinkError, LinkResult};
pub use link::{ActuatorLink, Connection, LinkConfig, LinkState, LinkStats};
pub use port::{Parity, PortOpener, SerialOpener, SerialSettings, list_ports};
