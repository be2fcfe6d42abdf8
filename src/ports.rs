//! Serial device discovery.
//!
//! Thin enumeration of candidate serial devices on the host, for presentation
//! layers that let an operator pick the terminal's port. No protocol
//! semantics live here.

use tracing::debug;

use crate::error::{Error, Result};

/// List every serial port known to the host.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(Error::Enumerate)?;
    let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
    debug!("Found {} serial ports", names.len());
    Ok(names)
}

/// List USB serial ports only — payment terminals usually enumerate as
/// USB CDC/modem devices.
pub fn list_usb_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(Error::Enumerate)?;
    let names: Vec<String> = ports
        .into_iter()
        .filter(|p| matches!(p.port_type, serialport::SerialPortType::UsbPort(_)))
        .map(|p| p.port_name)
        .collect();
    debug!("Found {} USB serial ports", names.len());
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
