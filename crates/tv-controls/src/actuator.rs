//! Actuator interface for the voltage regulator.
//!
//! The controller never talks to hardware directly. An actuator owns whatever
//! link it needs and exposes two operations: block until connected, and write
//! a voltage. A failed write leaves the actuator disconnected; the caller is
//! expected to call [`Actuator::connect`] again before the next write.

use tv_core::Centivolts;

use crate::error::ControlResult;

pub trait Actuator {
    /// Establish a connection, blocking until one succeeds.
    fn connect(&mut self);

    /// Whether a live connection is currently held.
    fn is_connected(&self) -> bool;

    /// Write the commanded voltage.
    ///
    /// On failure returns [`ControlError::WriteError`](crate::ControlError::WriteError)
    /// and drops the connection.
    fn apply_voltage(&mut self, voltage: Centivolts) -> ControlResult<()>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn connect(&mut self) {
        (**self).connect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn apply_voltage(&mut self, voltage: Centivolts) -> ControlResult<()> {
        (**self).apply_voltage(voltage)
    }
}
