//! Store error type shared by all repositories.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use edgevest_core::investment::InvestmentError;
use edgevest_core::ledger::LedgerError;
use edgevest_core::transaction::{RequestError, TransitionError};
use edgevest_shared::AppError;

/// Errors from store operations.
///
/// Domain decisions bubble up unchanged from `edgevest-core`; everything the
/// database itself reports is wrapped as `Database` and treated as a system
/// fault.
#[derive(Debug, Error)]
pub enum StoreError {
    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Transaction not found (or not owned by the caller).
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Balance arithmetic rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Status transition rejected the operation.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Request validation rejected the operation.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Investment policy rejected the operation.
    #[error(transparent)]
    Investment(#[from] InvestmentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(_) | StoreError::TransactionNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            StoreError::Ledger(inner) => inner.into(),
            StoreError::Transition(inner) => inner.into(),
            StoreError::Request(inner) => inner.into(),
            StoreError::Investment(inner) => inner.into(),
            StoreError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}
