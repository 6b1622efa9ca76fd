//! Investment error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use edgevest_shared::AppError;

/// Errors from investment operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvestmentError {
    /// Investment not found (or not owned by the caller).
    #[error("Investment not found: {0}")]
    NotFound(Uuid),

    /// Package not found.
    #[error("Investment package not found: {0}")]
    PackageNotFound(Uuid),

    /// Package no longer accepts new investments.
    #[error("Investment package {0} is not active")]
    PackageInactive(Uuid),

    /// Amount is outside the package bounds.
    #[error("Investment amount must be between {min} and {max}")]
    InvalidAmount {
        /// Package minimum.
        min: Decimal,
        /// Package maximum.
        max: Decimal,
    },

    /// The investment is terminal or the cancellation window has passed.
    #[error("Investment can only be cancelled within {window_hours} hours of creation")]
    NotCancellable {
        /// Length of the cancellation window.
        window_hours: i64,
    },
}

impl From<InvestmentError> for AppError {
    fn from(err: InvestmentError) -> Self {
        match err {
            InvestmentError::NotFound(_) | InvestmentError::PackageNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            InvestmentError::InvalidAmount { .. } => Self::Validation(err.to_string()),
            InvestmentError::PackageInactive(_) | InvestmentError::NotCancellable { .. } => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
