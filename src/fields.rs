//! Static field table and validation for Concert request fields.
//!
//! The nine fields of a transaction request are described by a declarative
//! table (`FIELDS`): name, exact width, and constraint kind. Validation walks
//! the table in declaration order and stops at the first failure, so adding a
//! field or changing a constraint never touches control flow.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldReason};

// ---------------------------------------------------------------------------
// Protocol field values
// ---------------------------------------------------------------------------

/// Private-data indicator: include the private block in the terminal reply.
pub const INDICATOR_INCLUDE: &str = "1";
/// Private-data indicator: do not include the private block.
pub const INDICATOR_DO_NOT_INCLUDE: &str = "0";

/// Payment mode: bank card.
pub const MODE_BANK_CARD: &str = "1";
/// Payment mode: cheque.
pub const MODE_CHEQUE: &str = "C";

/// Transaction type: debit.
pub const TYPE_DEBIT: &str = "0";
/// Transaction type: credit.
pub const TYPE_CREDIT: &str = "1";

/// ISO 4217 numeric code for EUR.
pub const CURRENCY_EUR: &str = "978";
/// ISO 4217 numeric code for USD.
pub const CURRENCY_USD: &str = "840";

/// Blank private-data block (10 spaces).
pub const PRIVATE_EMPTY: &str = "          ";

/// Delay option: answer when the transaction completes.
pub const DELAY_NOW: &str = "A011";
/// Delay option: answer at end of transaction batch.
pub const DELAY_LATER: &str = "A010";

/// Authorization option: let the terminal decide when to go online.
pub const AUTHORIZATION_AUTO: &str = "B010";

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Identity of one protocol field, in frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RegisterId,
    Amount,
    Indicator,
    Mode,
    TransactionType,
    Currency,
    PrivateData,
    Delay,
    Authorization,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::RegisterId => "cash register id",
            Field::Amount => "amount",
            Field::Indicator => "indicator",
            Field::Mode => "mode",
            Field::TransactionType => "transaction type",
            Field::Currency => "currency",
            Field::PrivateData => "private data",
            Field::Delay => "delay",
            Field::Authorization => "authorization",
        };
        f.write_str(name)
    }
}

/// Constraint kind applied to a field value (after the width check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// ASCII digits only.
    Digits,
    /// Any bytes of the right width.
    Any,
    /// Membership in a fixed value set.
    OneOf(&'static [&'static str]),
}

/// One entry of the static field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub len: usize,
    pub kind: FieldKind,
}

/// The nine request fields, in frame order. Payload width is the sum of the
/// entry widths (34 bytes).
pub static FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        field: Field::RegisterId,
        len: 2,
        kind: FieldKind::Digits,
    },
    FieldSpec {
        field: Field::Amount,
        len: 8,
        kind: FieldKind::Digits,
    },
    FieldSpec {
        field: Field::Indicator,
        len: 1,
        kind: FieldKind::Any,
    },
    FieldSpec {
        field: Field::Mode,
        len: 1,
        kind: FieldKind::OneOf(&[MODE_BANK_CARD, MODE_CHEQUE]),
    },
    FieldSpec {
        field: Field::TransactionType,
        len: 1,
        kind: FieldKind::OneOf(&[TYPE_DEBIT, TYPE_CREDIT]),
    },
    FieldSpec {
        field: Field::Currency,
        len: 3,
        kind: FieldKind::Any,
    },
    FieldSpec {
        field: Field::PrivateData,
        len: 10,
        kind: FieldKind::Any,
    },
    FieldSpec {
        field: Field::Delay,
        len: 4,
        kind: FieldKind::OneOf(&[DELAY_NOW, DELAY_LATER]),
    },
    // The reference implementation compared the *mode* value against the
    // authorization constant here, which can never match once mode is valid.
    // We validate the authorization field itself against the known codes.
    FieldSpec {
        field: Field::Authorization,
        len: 4,
        kind: FieldKind::OneOf(&[AUTHORIZATION_AUTO]),
    },
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check one candidate value against its table entry.
pub fn validate_field(spec: &FieldSpec, value: &str) -> Result<(), FieldError> {
    if value.len() != spec.len {
        return Err(FieldError {
            field: spec.field,
            reason: FieldReason::Length {
                expected: spec.len,
                actual: value.len(),
            },
        });
    }

    match spec.kind {
        FieldKind::Digits => {
            if !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(FieldError {
                    field: spec.field,
                    reason: FieldReason::NotNumeric,
                });
            }
        }
        FieldKind::Any => {}
        FieldKind::OneOf(allowed) => {
            if !allowed.contains(&value) {
                return Err(FieldError {
                    field: spec.field,
                    reason: FieldReason::UnknownValue,
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
