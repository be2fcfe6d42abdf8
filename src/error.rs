//! Error types and handling.
//!
//! Three taxonomies, kept as distinct variants so callers can branch on the
//! category without magic numbers: validation errors (raised before any I/O),
//! transport errors (wrapping the OS-level cause plus the failing operation),
//! and protocol errors (the channel worked but the terminal misbehaved).

use std::fmt;

use thiserror::Error;

use crate::fields::Field;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A request field failed validation. No I/O was attempted.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// The serial device could not be opened or configured.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Write to the serial device failed.
    #[error("serial write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Read from the serial device failed (including an expired read timeout).
    #[error("serial read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Operation attempted on a link that is not open.
    #[error("serial link is not open")]
    LinkClosed,

    /// The device accepted fewer bytes than the full frame.
    #[error("short write: device accepted {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Serial device enumeration failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    /// The terminal answered the enquiry with something other than ACK.
    #[error("terminal replied 0x{got:02X} to ENQ, expected ACK (0x06)")]
    UnexpectedReply { got: u8 },

    /// An inbound frame could not be decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A single request field was rejected.
///
/// Carries the identity of the failing field and the constraint it broke, so
/// the caller can correct the input rather than guess.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct FieldError {
    pub field: Field,
    pub reason: FieldReason,
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldReason {
    /// Wrong length (all Concert fields are fixed-width).
    Length { expected: usize, actual: usize },
    /// A non-digit in a digits-only field.
    NotNumeric,
    /// Value outside the field's enumerated set.
    UnknownValue,
}

impl fmt::Display for FieldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldReason::Length { expected, actual } => {
                write!(f, "expected exactly {expected} characters, got {actual}")
            }
            FieldReason::NotNumeric => write!(f, "must contain ASCII digits only"),
            FieldReason::UnknownValue => write!(f, "not an allowed value for this field"),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame decode errors
// ---------------------------------------------------------------------------

/// An inbound byte sequence is not a well-formed Concert frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is {0} bytes, expected 37")]
    Length(usize),

    #[error("frame does not start with STX (0x02)")]
    MissingStx,

    #[error("frame payload is not terminated by ETX (0x03)")]
    MissingEtx,

    #[error("frame contains non-ASCII payload bytes")]
    NotAscii,

    #[error("LRC mismatch: computed 0x{computed:02X}, frame carries 0x{carried:02X}")]
    Checksum { computed: u8, carried: u8 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display_names_field_and_reason() {
        let err = FieldError {
            field: Field::Amount,
            reason: FieldReason::Length {
                expected: 8,
                actual: 3,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("amount"));
        assert!(msg.contains("8"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_validation_error_distinguishable_from_transport() {
        let err: Error = FieldError {
            field: Field::Currency,
            reason: FieldReason::Length {
                expected: 3,
                actual: 0,
            },
        }
        .into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!matches!(err, Error::Read(_)));
    }

    #[test]
    fn test_unexpected_reply_display() {
        let err = Error::UnexpectedReply { got: 0x15 };
        assert!(err.to_string().contains("0x15"));
    }
}
