//! Transaction error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::TransactionStatus;
use edgevest_shared::AppError;

/// Errors from the status transition state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The transaction already reached a terminal status. Duplicate webhook
    /// or admin deliveries land here and are safe to acknowledge as a no-op.
    #[error("Transaction already processed (status: {status})")]
    AlreadyProcessed {
        /// The terminal status the transaction is in.
        status: TransactionStatus,
    },

    /// The requested (from, to) pair is not a legal transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: TransactionStatus,
        /// Requested status.
        to: TransactionStatus,
    },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyProcessed { .. } => Self::Conflict(err.to_string()),
            TransitionError::InvalidTransition { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}

/// Errors from deposit/withdrawal request validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Amount must be strictly positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Amount is below the configured minimum.
    #[error("Amount is below the minimum of {minimum}")]
    AmountTooLow {
        /// Configured minimum amount.
        minimum: Decimal,
    },

    /// The balance cannot cover the amount plus fees.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Balance available on the account.
        available: Decimal,
        /// Amount plus fees required.
        required: Decimal,
    },

    /// A user may only cancel their own pending request shortly after
    /// creating it.
    #[error("Requests can only be cancelled within {window_hours} hours of creation")]
    CancellationWindowExpired {
        /// Length of the cancellation window.
        window_hours: i64,
    },
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NonPositiveAmount | RequestError::AmountTooLow { .. } => {
                Self::Validation(err.to_string())
            }
            RequestError::InsufficientBalance { .. }
            | RequestError::CancellationWindowExpired { .. } => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
