//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use edgevest_shared::AppError;

/// Errors from balance arithmetic.
///
/// These are domain errors, not system faults: they abort the surrounding
/// unit of work with no partial writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Amounts must be strictly positive.
    #[error("Ledger amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The balance cannot cover the requested debit.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Balance available on the account.
        available: Decimal,
        /// Amount required for the debit.
        required: Decimal,
    },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NonPositiveAmount(_) => Self::Validation(err.to_string()),
            LedgerError::InsufficientBalance { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
