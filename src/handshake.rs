//! ENQ/ACK liveness handshake.
//!
//! Probes terminal availability with a single two-byte exchange: one enquiry
//! byte out, one blocking read back. Exactly one round trip per invocation,
//! no retries. A reply other than ACK is a protocol error, surfaced
//! distinctly from transport errors since the channel itself is healthy.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transport::TerminalLink;

/// Enquiry byte sent to probe the terminal.
pub const ENQ: u8 = 0x05;
/// Acknowledge byte expected back from a live terminal.
pub const ACK: u8 = 0x06;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Handshake progression: `Idle → AwaitingAck → {Acked, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    AwaitingAck,
    Acked,
    Failed,
}

/// One enquiry/acknowledge exchange with observable state.
#[derive(Debug)]
pub struct Handshake {
    state: HandshakeState,
}

impl Handshake {
    pub fn new() -> Self {
        Self {
            state: HandshakeState::Idle,
        }
    }

    /// Current state of the exchange.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Run one round trip over `link`.
    ///
    /// Sends ENQ, performs one blocking read, and checks the first reply byte
    /// against ACK. Any I/O error at either step, or any other reply byte,
    /// ends in [`HandshakeState::Failed`].
    pub fn run(&mut self, link: &mut dyn TerminalLink) -> Result<()> {
        self.state = HandshakeState::Idle;

        if let Err(e) = link.send(&[ENQ]) {
            warn!("Handshake ENQ send failed: {e}");
            self.state = HandshakeState::Failed;
            return Err(e);
        }
        debug!("Handshake ENQ sent");
        self.state = HandshakeState::AwaitingAck;

        let mut reply = [0u8; 1];
        match link.receive(&mut reply) {
            Ok(n) if n > 0 && reply[0] == ACK => {
                debug!("Handshake ACK received");
                self.state = HandshakeState::Acked;
                Ok(())
            }
            Ok(_) => {
                warn!("Handshake reply 0x{:02X}, expected ACK", reply[0]);
                self.state = HandshakeState::Failed;
                Err(Error::UnexpectedReply { got: reply[0] })
            }
            Err(e) => {
                warn!("Handshake read failed: {e}");
                self.state = HandshakeState::Failed;
                Err(e)
            }
        }
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: run one handshake and report the outcome.
pub fn ping(link: &mut dyn TerminalLink) -> Result<()> {
    Handshake::new().run(link)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockLink;

    #[test]
    fn test_ack_reply_succeeds() {
        let mut link = MockLink::replying(&[ACK]);
        let mut handshake = Handshake::new();
        assert!(handshake.run(&mut link).is_ok());
        assert_eq!(handshake.state(), HandshakeState::Acked);
        assert_eq!(link.sent, vec![ENQ]);
    }

    #[test]
    fn test_wrong_byte_is_protocol_error() {
        let mut link = MockLink::replying(&[0x15]);
        let mut handshake = Handshake::new();
        let err = handshake.run(&mut link).unwrap_err();
        assert!(matches!(err, Error::UnexpectedReply { got: 0x15 }));
        assert_eq!(handshake.state(), HandshakeState::Failed);
    }

    #[test]
    fn test_read_error_is_transport_error() {
        let mut link = MockLink::silent();
        let mut handshake = Handshake::new();
        let err = handshake.run(&mut link).unwrap_err();
        assert!(matches!(err, Error::Read(_)));
        assert_eq!(handshake.state(), HandshakeState::Failed);
    }

    #[test]
    fn test_exactly_one_round_trip_no_retries() {
        let mut link = MockLink::replying(&[0x15]);
        let _ = ping(&mut link);
        assert_eq!(link.ops, vec!["send:1".to_string(), "receive".to_string()]);
    }

    #[test]
    fn test_send_failure_skips_the_read() {
        let mut link = MockLink::replying(&[ACK]);
        link.fail_send = true;
        let mut handshake = Handshake::new();
        let err = handshake.run(&mut link).unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert_eq!(handshake.state(), HandshakeState::Failed);
        assert_eq!(link.ops, vec!["send:1".to_string()]);
    }
}
