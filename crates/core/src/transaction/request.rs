//! Deposit and withdrawal request policies.
//!
//! Requests seed the pending state of the transaction lifecycle. Deposits
//! credit nothing until confirmed; withdrawals hold amount + fee immediately,
//! which is why failed/cancelled withdrawals must refund (see `transition`).

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::RequestError;
use crate::settings::PlatformSettings;

/// Hours after creation during which a user may cancel their own pending
/// deposit or withdrawal request.
pub const USER_CANCEL_WINDOW_HOURS: i64 = 1;

/// Result of validating a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalQuote {
    /// Amount the user receives.
    pub amount: Decimal,
    /// Fee charged on top of the amount.
    pub fee: Decimal,
    /// Total debited from the balance at request time (amount + fee).
    pub total_debit: Decimal,
}

/// Validates a deposit request amount against the configured minimum.
///
/// # Errors
///
/// Returns an error for non-positive or below-minimum amounts.
pub fn validate_deposit(amount: Decimal, settings: &PlatformSettings) -> Result<(), RequestError> {
    if amount <= Decimal::ZERO {
        return Err(RequestError::NonPositiveAmount);
    }
    if amount < settings.min_deposit_amount {
        return Err(RequestError::AmountTooLow {
            minimum: settings.min_deposit_amount,
        });
    }
    Ok(())
}

/// Validates a withdrawal request and computes the fee and hold.
///
/// fee = amount x fee% / 100, rounded to cents (banker's rounding). The
/// caller must debit `total_debit` in the same atomic unit of work that
/// inserts the pending transaction.
///
/// # Errors
///
/// Returns an error for non-positive amounts, amounts below the configured
/// minimum, or balances that cannot cover amount + fee.
pub fn quote_withdrawal(
    amount: Decimal,
    settings: &PlatformSettings,
    available: Decimal,
) -> Result<WithdrawalQuote, RequestError> {
    if amount <= Decimal::ZERO {
        return Err(RequestError::NonPositiveAmount);
    }
    if amount < settings.min_withdrawal_amount {
        return Err(RequestError::AmountTooLow {
            minimum: settings.min_withdrawal_amount,
        });
    }

    let fee = percentage_of(amount, settings.withdrawal_fee_percentage);
    let total_debit = amount + fee;

    if available < total_debit {
        return Err(RequestError::InsufficientBalance {
            available,
            required: total_debit,
        });
    }

    Ok(WithdrawalQuote {
        amount,
        fee,
        total_debit,
    })
}

/// Checks that a user-initiated cancellation of their own pending request is
/// still inside the window.
///
/// Admin- and webhook-driven transitions are not window-bound; this applies
/// only to the self-service cancel path.
///
/// # Errors
///
/// Returns `CancellationWindowExpired` outside the window.
pub fn ensure_user_cancellable(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), RequestError> {
    if now - created_at > Duration::hours(USER_CANCEL_WINDOW_HOURS) {
        return Err(RequestError::CancellationWindowExpired {
            window_hours: USER_CANCEL_WINDOW_HOURS,
        });
    }
    Ok(())
}

/// Computes `amount x percentage / 100`, rounded to cents with banker's
/// rounding.
#[must_use]
pub fn percentage_of(amount: Decimal, percentage: Decimal) -> Decimal {
    (amount * percentage / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
