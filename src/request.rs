//! Request orchestration.
//!
//! Builds a transaction request from the fixed simple-request defaults and
//! drives one encode → open → write → close cycle against the terminal. The
//! frame is encoded before any I/O, so a validation failure never touches the
//! device; once the port is open it is closed on every path, success or not.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fields::{
    AUTHORIZATION_AUTO, DELAY_NOW, INDICATOR_DO_NOT_INCLUDE, MODE_BANK_CARD, PRIVATE_EMPTY,
    TYPE_CREDIT,
};
use crate::message::TransactionRequest;
use crate::transport::{SerialLink, TerminalLink};

/// Register identifier used by simple requests.
pub const DEFAULT_REGISTER_ID: &str = "01";

/// Build a bank-card credit request with the simple-request defaults.
///
/// `amount` is in the smallest currency unit and is zero-padded to the 8-digit
/// amount field; `currency` is the 3-character ISO 4217 numeric code (e.g.
/// `"978"` for EUR). An amount too large for 8 digits fails validation at
/// encode time.
pub fn simple_request(amount: u32, currency: &str) -> TransactionRequest {
    TransactionRequest {
        register_id: DEFAULT_REGISTER_ID.into(),
        amount: format!("{amount:08}"),
        indicator: INDICATOR_DO_NOT_INCLUDE.into(),
        mode: MODE_BANK_CARD.into(),
        transaction_type: TYPE_CREDIT.into(),
        currency: currency.into(),
        private_data: PRIVATE_EMPTY.into(),
        delay: DELAY_NOW.into(),
        authorization: AUTHORIZATION_AUTO.into(),
    }
}

/// Send a defaulted bank-card credit request to the terminal at `path`.
pub fn send_simple_request(path: &str, amount: u32, currency: &str) -> Result<()> {
    send_request(path, &simple_request(amount, currency))
}

/// Encode `request` and deliver it to the terminal at `path`.
///
/// Propagates the specific field error on validation failure, the open error
/// if the device cannot be configured, and otherwise the outcome of the
/// write/close sequence.
pub fn send_request(path: &str, request: &TransactionRequest) -> Result<()> {
    let frame = request.encode()?;
    let mut link = SerialLink::open(path)?;
    deliver(&mut link, &frame)
}

/// Write the frame, then close the link unconditionally.
///
/// A write failure still closes the link and takes precedence over any close
/// failure; a short write of the fixed-width frame is reported as a failed
/// delivery since the terminal cannot parse a truncated frame.
fn deliver(link: &mut dyn TerminalLink, frame: &[u8]) -> Result<()> {
    let sent = link.send(frame);
    let closed = link.close();

    let written = match sent {
        Ok(n) => n,
        Err(e) => {
            warn!("Frame write failed: {e}");
            return Err(e);
        }
    };
    if written != frame.len() {
        return Err(Error::ShortWrite {
            written,
            expected: frame.len(),
        });
    }
    closed?;

    info!("Transaction request delivered ({written} bytes)");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FRAME_LEN;
    use crate::transport::mock::MockLink;

    #[test]
    fn test_simple_request_defaults() {
        let request = simple_request(12599, "978");
        assert_eq!(request.register_id, "01");
        assert_eq!(request.amount, "00012599");
        assert_eq!(request.indicator, INDICATOR_DO_NOT_INCLUDE);
        assert_eq!(request.mode, MODE_BANK_CARD);
        assert_eq!(request.transaction_type, TYPE_CREDIT);
        assert_eq!(request.currency, "978");
        assert_eq!(request.private_data, PRIVATE_EMPTY);
        assert_eq!(request.delay, DELAY_NOW);
        assert_eq!(request.authorization, AUTHORIZATION_AUTO);
    }

    #[test]
    fn test_simple_request_encodes_to_full_frame() {
        let frame = simple_request(12599, "978").encode().unwrap();
        assert_eq!(frame.len(), FRAME_LEN);
        assert_eq!(&frame[3..11], b"00012599");
        // XOR of the payload plus ETX for this amount happens to be zero.
        assert_eq!(frame[FRAME_LEN - 1], 0x00);
    }

    #[test]
    fn test_oversized_amount_fails_validation() {
        let err = simple_request(123_456_789, "978").encode().unwrap_err();
        assert_eq!(err.field, crate::fields::Field::Amount);
    }

    #[test]
    fn test_deliver_writes_then_closes() {
        let frame = simple_request(12599, "978").encode().unwrap();
        let mut link = MockLink::replying(&[]);
        deliver(&mut link, &frame).unwrap();
        assert_eq!(
            link.ops,
            vec![format!("send:{FRAME_LEN}"), "close".to_string()]
        );
        assert_eq!(link.sent, frame);
        assert!(!link.is_open());
    }

    #[test]
    fn test_deliver_closes_even_when_write_fails() {
        let frame = simple_request(100, "978").encode().unwrap();
        let mut link = MockLink::replying(&[]);
        link.fail_send = true;
        let err = deliver(&mut link, &frame).unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert_eq!(
            link.ops,
            vec![format!("send:{FRAME_LEN}"), "close".to_string()]
        );
        assert!(!link.is_open());
    }

    #[test]
    fn test_deliver_reports_short_write() {
        let frame = simple_request(100, "978").encode().unwrap();
        let mut link = MockLink::replying(&[]);
        link.short_send = true;
        let err = deliver(&mut link, &frame).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortWrite {
                written: 36,
                expected: 37
            }
        ));
        assert!(!link.is_open());
    }

    #[test]
    fn test_send_request_validates_before_any_io() {
        let mut request = simple_request(100, "978");
        request.currency = "97".into();
        // A validation failure must surface even though the path is bogus:
        // the encode aborts before the device is ever touched.
        let err = send_request("/dev/tty-concert-does-not-exist", &request).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
