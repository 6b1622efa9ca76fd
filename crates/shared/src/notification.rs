//! Post-commit notification events.
//!
//! Ledger-mutating operations never send email inside their atomic unit of
//! work. They return one of these events instead; the caller emits it after
//! commit and a separate worker delivers it best-effort. A lost or failed
//! notification never rolls back the operation that produced it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// An event emitted after an atomic unit of work commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A deposit was confirmed and the balance credited.
    DepositConfirmed {
        /// Recipient address.
        email: String,
        /// Recipient first name.
        first_name: String,
        /// Credited amount.
        amount: Decimal,
        /// The confirmed deposit transaction.
        transaction_id: Uuid,
    },
    /// A withdrawal request was accepted and the funds held.
    WithdrawalRequested {
        /// Recipient address.
        email: String,
        /// Recipient first name.
        first_name: String,
        /// Requested amount (excluding fee).
        amount: Decimal,
        /// Fee charged on top of the amount.
        fee: Decimal,
        /// Payment method chosen by the user.
        payment_method: String,
        /// The pending withdrawal transaction.
        transaction_id: Uuid,
    },
    /// An investment was opened.
    InvestmentOpened {
        /// Recipient address.
        email: String,
        /// Recipient first name.
        first_name: String,
        /// Package the user invested in.
        package_name: String,
        /// Invested principal.
        amount: Decimal,
        /// Profit fixed at creation.
        expected_return: Decimal,
        /// Maturity date.
        end_date: DateTime<Utc>,
    },
    /// An investment matured and principal + profit were paid out.
    InvestmentMatured {
        /// Recipient address.
        email: String,
        /// Recipient first name.
        first_name: String,
        /// Package the investment belonged to.
        package_name: String,
        /// Principal + profit returned to the balance.
        payout: Decimal,
        /// The completed investment.
        investment_id: Uuid,
    },
}

impl NotificationEvent {
    /// Recipient address for this event.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::DepositConfirmed { email, .. }
            | Self::WithdrawalRequested { email, .. }
            | Self::InvestmentOpened { email, .. }
            | Self::InvestmentMatured { email, .. } => email,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DepositConfirmed { .. } => "deposit_confirmed",
            Self::WithdrawalRequested { .. } => "withdrawal_requested",
            Self::InvestmentOpened { .. } => "investment_opened",
            Self::InvestmentMatured { .. } => "investment_matured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_recipient_and_kind() {
        let event = NotificationEvent::DepositConfirmed {
            email: "user@example.com".to_string(),
            first_name: "Ada".to_string(),
            amount: dec!(250),
            transaction_id: Uuid::new_v4(),
        };
        assert_eq!(event.recipient(), "user@example.com");
        assert_eq!(event.kind(), "deposit_confirmed");
    }
}
