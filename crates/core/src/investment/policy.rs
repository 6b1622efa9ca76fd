//! Investment lifecycle rules.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::error::InvestmentError;
use super::types::{InvestmentQuote, InvestmentStatus, PackageTerms};
use crate::transaction::request::percentage_of;

/// Hours after creation during which an active investment can be cancelled.
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;

/// Stateless service for investment decisions.
pub struct InvestmentPolicy;

impl InvestmentPolicy {
    /// Quotes a new investment against a package.
    ///
    /// The quote fixes the investment's terms forever: `expected_return` and
    /// `end_date` are stored on the row and later package edits do not touch
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if the package is inactive or the amount is outside
    /// its bounds.
    pub fn quote(
        terms: &PackageTerms,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<InvestmentQuote, InvestmentError> {
        if !terms.is_active {
            return Err(InvestmentError::PackageInactive(terms.id));
        }
        if amount < terms.min_amount || amount > terms.max_amount {
            return Err(InvestmentError::InvalidAmount {
                min: terms.min_amount,
                max: terms.max_amount,
            });
        }

        Ok(InvestmentQuote {
            expected_return: percentage_of(amount, terms.return_rate),
            end_date: now + Duration::days(terms.duration_days),
        })
    }

    /// Checks that an investment can still be cancelled.
    ///
    /// Only active investments within [`CANCELLATION_WINDOW_HOURS`] of
    /// creation qualify.
    ///
    /// # Errors
    ///
    /// Returns `NotCancellable` for terminal investments and expired windows.
    pub fn ensure_cancellable(
        status: InvestmentStatus,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), InvestmentError> {
        if status != InvestmentStatus::Active
            || now - created_at > Duration::hours(CANCELLATION_WINDOW_HOURS)
        {
            return Err(InvestmentError::NotCancellable {
                window_hours: CANCELLATION_WINDOW_HOURS,
            });
        }
        Ok(())
    }

    /// Principal + profit returned to the balance at maturity.
    #[must_use]
    pub fn payout(amount: Decimal, expected_return: Decimal) -> Decimal {
        amount + expected_return
    }

    /// Whether an investment is eligible for the maturity batch.
    #[must_use]
    pub fn is_matured(
        status: InvestmentStatus,
        end_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        status == InvestmentStatus::Active && end_date <= now
    }
}
