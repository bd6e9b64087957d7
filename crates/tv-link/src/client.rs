//! Modbus RTU master over a byte stream.
//!
//! `rmodbus` builds request frames and checks replies (slave, function,
//! CRC, exception codes); this module moves the bytes and keeps the bus
//! quiet between frames.

use rmodbus::{ModbusProto, client::ModbusRequest, guess_response_frame_len};
use std::io::{Read, Write};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{LinkError, LinkResult};

/// Reply bytes needed before its full length is known: slave, function and
/// byte count (or exception code).
const REPLY_HEAD: usize = 3;

/// Minimum bus silence between frames: 3.5 character times, 11 bits per
/// character, fixed at 1.75 ms above 19200 baud.
pub fn frame_gap(baud_rate: u32) -> Duration {
    if baud_rate == 0 || baud_rate > 19_200 {
        return Duration::from_micros(1_750);
    }
    Duration::from_secs_f64(3.5 * 11.0 / baud_rate as f64)
}

/// Request/response client for a single slave.
///
/// The port's own read timeout bounds every exchange; a slave that never
/// answers surfaces as an [`std::io::ErrorKind::TimedOut`] I/O error.
pub struct RtuClient<P> {
    port: P,
    request: ModbusRequest,
    gap: Duration,
    last_frame: Option<Instant>,
}

impl<P: Read + Write> RtuClient<P> {
    pub fn new(port: P, slave: u8, baud_rate: u32) -> Self {
        Self {
            port,
            request: ModbusRequest::new(slave, ModbusProto::Rtu),
            gap: frame_gap(baud_rate),
            last_frame: None,
        }
    }

    /// Read one holding register (function 0x03).
    pub fn read_holding_register(&mut self, address: u16) -> LinkResult<u16> {
        let mut frame = Vec::new();
        self.request.generate_get_holdings(address, 1, &mut frame)?;
        let reply = self.transact(&frame)?;

        let mut values: Vec<u16> = Vec::new();
        self.request.parse_u16(&reply, &mut values)?;
        values
            .first()
            .copied()
            .ok_or_else(|| LinkError::unexpected("empty register reply"))
    }

    /// Write one holding register (function 0x10, quantity 1).
    pub fn write_register(&mut self, address: u16, value: u16) -> LinkResult<()> {
        let mut frame = Vec::new();
        self.request
            .generate_set_holdings_bulk(address, &[value], &mut frame)?;
        let reply = self.transact(&frame)?;
        self.request.parse_ok(&reply)?;
        Ok(())
    }

    fn transact(&mut self, frame: &[u8]) -> LinkResult<Vec<u8>> {
        self.wait_for_silence();

        trace!(tx = ?frame, "modbus request");
        self.port.write_all(frame)?;
        self.port.flush()?;

        let result = self.read_reply();
        self.last_frame = Some(Instant::now());
        result
    }

    fn read_reply(&mut self) -> LinkResult<Vec<u8>> {
        let mut reply = vec![0u8; REPLY_HEAD];
        self.port.read_exact(&mut reply)?;

        let total = usize::from(guess_response_frame_len(&reply, ModbusProto::Rtu)?);
        if total > REPLY_HEAD {
            reply.resize(total, 0);
            self.port.read_exact(&mut reply[REPLY_HEAD..])?;
        }
        trace!(rx = ?reply, "modbus response");
        Ok(reply)
    }

    fn wait_for_silence(&self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.gap {
                std::thread::sleep(self.gap - elapsed);
            }
        }
    }
}
