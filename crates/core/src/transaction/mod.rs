//! Transaction domain: status state machine and request policies.
//!
//! This module implements:
//! - Transaction type and status enums
//! - The pending -> terminal status state machine with balance side-effects
//! - Deposit and withdrawal request validation (fees, minimums, holds)
//! - Actor identity for audit logging

pub mod error;
pub mod request;
pub mod transition;
pub mod types;

#[cfg(test)]
mod transition_props;

pub use error::{RequestError, TransitionError};
pub use request::{
    USER_CANCEL_WINDOW_HOURS, WithdrawalQuote, ensure_user_cancellable, quote_withdrawal,
    validate_deposit,
};
pub use transition::{BalanceEffect, TransitionEngine, TransitionPlan};
pub use types::{Actor, PaymentMethod, TransactionStatus, TransactionType};
