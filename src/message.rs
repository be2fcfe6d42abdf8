//! Concert frame codec.
//!
//! Frame format:
//! `STX | register(2) | amount(8) | indicator(1) | mode(1) | type(1) |
//! currency(3) | private(10) | delay(4) | authorization(4) | ETX | LRC`
//!
//! The LRC is the XOR of every byte between STX (exclusive) and the LRC
//! itself, i.e. the 34 payload bytes plus ETX. Total frame length is fixed at
//! 37 bytes and never depends on field contents.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, FrameError};
use crate::fields::{validate_field, Field, FIELDS};

// ---------------------------------------------------------------------------
// Frame constants
// ---------------------------------------------------------------------------

/// Start-of-text marker, first byte of every frame.
pub const STX: u8 = 0x02;
/// End-of-text marker, closes the payload.
pub const ETX: u8 = 0x03;

/// Width of the nine concatenated fields.
pub const PAYLOAD_LEN: usize = 34;
/// Total frame width: STX + payload + ETX + LRC.
pub const FRAME_LEN: usize = PAYLOAD_LEN + 3;

/// Longitudinal redundancy check: XOR fold of a byte span, seed 0.
pub fn lrc(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

// ---------------------------------------------------------------------------
// Transaction request
// ---------------------------------------------------------------------------

/// One concrete assignment for the nine Concert request fields.
///
/// Immutable once built; consumed by [`TransactionRequest::encode`]. Field
/// values are plain ASCII strings at the widths required by the protocol —
/// see the constants in [`crate::fields`] for the enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub register_id: String,
    pub amount: String,
    pub indicator: String,
    pub mode: String,
    pub transaction_type: String,
    pub currency: String,
    pub private_data: String,
    pub delay: String,
    pub authorization: String,
}

impl TransactionRequest {
    /// Value of one field, for table-driven validation and encoding.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::RegisterId => &self.register_id,
            Field::Amount => &self.amount,
            Field::Indicator => &self.indicator,
            Field::Mode => &self.mode,
            Field::TransactionType => &self.transaction_type,
            Field::Currency => &self.currency,
            Field::PrivateData => &self.private_data,
            Field::Delay => &self.delay,
            Field::Authorization => &self.authorization,
        }
    }

    /// Encode the request into a complete 37-byte frame.
    ///
    /// All nine fields are validated in frame order first; the first invalid
    /// field aborts the encode with its specific error and no frame is
    /// produced. Encoding is pure — identical input yields byte-identical
    /// output.
    pub fn encode(&self) -> Result<Vec<u8>, FieldError> {
        for spec in &FIELDS {
            validate_field(spec, self.value(spec.field))?;
        }

        // Checksum span: payload + ETX.
        let mut span = Vec::with_capacity(PAYLOAD_LEN + 1);
        for spec in &FIELDS {
            span.extend_from_slice(self.value(spec.field).as_bytes());
        }
        span.push(ETX);

        let mut frame = Vec::with_capacity(FRAME_LEN);
        frame.push(STX);
        let checksum = lrc(&span);
        frame.extend_from_slice(&span);
        frame.push(checksum);

        debug!("Encoded frame ({} bytes): {:02X?}", frame.len(), frame);
        Ok(frame)
    }

    /// Decode a complete frame back into its nine field values.
    ///
    /// Checks total length, the STX/ETX markers, and the LRC before
    /// recovering anything; a frame whose LRC does not match the payload is
    /// corrupt and rejected.
    pub fn decode(frame: &[u8]) -> Result<Self, FrameError> {
        if frame.len() != FRAME_LEN {
            return Err(FrameError::Length(frame.len()));
        }
        if frame[0] != STX {
            return Err(FrameError::MissingStx);
        }
        if frame[FRAME_LEN - 2] != ETX {
            return Err(FrameError::MissingEtx);
        }

        let span = &frame[1..FRAME_LEN - 1];
        let computed = lrc(span);
        let carried = frame[FRAME_LEN - 1];
        if computed != carried {
            return Err(FrameError::Checksum { computed, carried });
        }

        let payload = &frame[1..1 + PAYLOAD_LEN];
        if !payload.is_ascii() {
            return Err(FrameError::NotAscii);
        }

        let mut offset = 0usize;
        let mut take = |len: usize| {
            let value = String::from_utf8_lossy(&payload[offset..offset + len]).into_owned();
            offset += len;
            value
        };

        Ok(Self {
            register_id: take(2),
            amount: take(8),
            indicator: take(1),
            mode: take(1),
            transaction_type: take(1),
            currency: take(3),
            private_data: take(10),
            delay: take(4),
            authorization: take(4),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
