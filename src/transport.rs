//! Serial transport for the terminal link.
//!
//! Defines the byte-level [`TerminalLink`] trait and [`SerialLink`], its
//! `serialport`-backed implementation pinned to the Concert configuration:
//! 9600 baud, 8 data bits, no parity, 1 stop bit, raw mode, no flow control.
//!
//! Every operation blocks the calling thread and either completes or returns
//! an error; no buffering or retry logic is layered over the raw calls. A
//! link is not designed for concurrent use — at most one operation may be in
//! flight against it at a time.

use std::io::{Read, Write};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Link configuration
// ---------------------------------------------------------------------------

/// Fixed Concert line speed.
pub const BAUD_RATE: u32 = 9600;

/// Default blocking-read timeout. The protocol layer adds no retries on top;
/// an expired timeout surfaces as the read's I/O error.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Abstract byte-level link to a payment terminal.
pub trait TerminalLink {
    /// Single blocking write. Returns the count actually written, which may
    /// be less than requested.
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Single blocking read into `buf`, until at least one byte or an I/O
    /// error arrives. Returns the count read.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Release the link. Fails on an already-closed link.
    fn close(&mut self) -> Result<()>;

    /// Whether the link is currently open.
    fn is_open(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Serial link
// ---------------------------------------------------------------------------

/// Serial (RS-232 / USB-serial) link using the `serialport` crate.
///
/// The port is released when the link is closed or dropped, so the device is
/// freed on every exit path even if the caller never calls [`close`].
///
/// [`close`]: TerminalLink::close
pub struct SerialLink {
    port_name: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialLink {
    /// Open `path` at the fixed Concert configuration with the default read
    /// timeout.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_READ_TIMEOUT)
    }

    /// Open `path` with an explicit blocking-read timeout.
    pub fn open_with_timeout(path: &str, read_timeout: Duration) -> Result<Self> {
        info!("Opening serial port {path} @ {BAUD_RATE} baud");

        let port = serialport::new(path, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(read_timeout)
            .open()
            .map_err(|source| Error::Open {
                port: path.to_string(),
                source,
            })?;

        info!("Serial port {path} opened");
        Ok(Self {
            port_name: path.to_string(),
            port: Some(port),
        })
    }

    /// Device path this link was opened on.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl TerminalLink for SerialLink {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::LinkClosed)?;
        let n = port.write(data).map_err(Error::Write)?;
        port.flush().map_err(Error::Write)?;
        debug!("Serial TX {} ({n} bytes): {:02X?}", self.port_name, &data[..n]);
        Ok(n)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::LinkClosed)?;
        let n = port.read(buf).map_err(Error::Read)?;
        debug!("Serial RX {} ({n} bytes): {:02X?}", self.port_name, &buf[..n]);
        Ok(n)
    }

    fn close(&mut self) -> Result<()> {
        match self.port.take() {
            Some(port) => {
                drop(port);
                info!("Serial port {} closed", self.port_name);
                Ok(())
            }
            None => Err(Error::LinkClosed),
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
