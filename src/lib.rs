//! Concert ECR protocol for payment terminals over a serial link.
//!
//! Encodes payment-transaction requests into the fixed 37-byte Concert wire
//! frame (STX | nine fixed-width ASCII fields | ETX | XOR LRC), transports
//! the frame to a point-of-sale terminal (TPE) over a serial connection at
//! 9600 8N1, and implements the ENQ/ACK handshake used to probe terminal
//! liveness.
//!
//! The model is single-threaded and fully synchronous: every transport call
//! blocks until the underlying I/O completes or fails. Callers that need
//! timeouts beyond the configurable blocking-read timeout, retries, or async
//! execution layer them on top of [`TerminalLink`] without touching the
//! protocol logic.

pub mod error;
pub mod fields;
pub mod handshake;
pub mod message;
pub mod ports;
pub mod request;
pub mod transport;

pub use error::{Error, FieldError, FieldReason, FrameError, Result};
pub use fields::Field;
pub use handshake::{ping, Handshake, HandshakeState};
pub use message::{TransactionRequest, FRAME_LEN};
pub use request::{send_request, send_simple_request, simple_request};
pub use transport::{SerialLink, TerminalLink};
