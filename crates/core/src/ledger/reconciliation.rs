//! Balance reconciliation over completed transaction history.
//!
//! The sum of a user's completed transactions must reconcile with their
//! account balance: deposits, payouts, referral bonuses, refunds and profit
//! adjustments add to it; withdrawals (plus their fees) and investments
//! subtract from it. The store never verifies this automatically; it is a
//! testable property and the input to support tooling.

use rust_decimal::Decimal;

use crate::transaction::types::TransactionType;

/// A completed transaction as seen by reconciliation.
///
/// Amounts are unsigned magnitudes; direction is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedEntry {
    /// Transaction type.
    pub tx_type: TransactionType,
    /// Unsigned amount.
    pub amount: Decimal,
    /// Fees charged on top of the amount (withdrawals only in practice).
    pub fees: Decimal,
}

impl CompletedEntry {
    /// Signed effect of this entry on the account balance.
    #[must_use]
    pub fn signed_effect(&self) -> Decimal {
        match self.tx_type {
            TransactionType::Deposit
            | TransactionType::Payout
            | TransactionType::Referral
            | TransactionType::Refund
            | TransactionType::Profit => self.amount,
            TransactionType::Withdrawal => -(self.amount + self.fees),
            TransactionType::Investment => -self.amount,
        }
    }
}

/// Net balance effect of a slice of completed transactions.
///
/// `initial_balance + net_effect(history)` must equal the current account
/// balance for a consistent ledger.
#[must_use]
pub fn net_effect(entries: &[CompletedEntry]) -> Decimal {
    entries.iter().map(CompletedEntry::signed_effect).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(tx_type: TransactionType, amount: Decimal) -> CompletedEntry {
        CompletedEntry {
            tx_type,
            amount,
            fees: dec!(0),
        }
    }

    #[test]
    fn test_inflows_are_positive() {
        for tx_type in [
            TransactionType::Deposit,
            TransactionType::Payout,
            TransactionType::Referral,
            TransactionType::Refund,
            TransactionType::Profit,
        ] {
            assert_eq!(entry(tx_type, dec!(10)).signed_effect(), dec!(10));
        }
    }

    #[test]
    fn test_withdrawal_includes_fees() {
        let withdrawal = CompletedEntry {
            tx_type: TransactionType::Withdrawal,
            amount: dec!(100),
            fees: dec!(0.50),
        };
        assert_eq!(withdrawal.signed_effect(), dec!(-100.50));
    }

    #[test]
    fn test_investment_is_negative() {
        assert_eq!(
            entry(TransactionType::Investment, dec!(500)).signed_effect(),
            dec!(-500)
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Deposit $2000, invest $500, payout $550 after maturity.
        let history = [
            entry(TransactionType::Deposit, dec!(2000)),
            entry(TransactionType::Investment, dec!(500)),
            entry(TransactionType::Payout, dec!(550)),
        ];
        assert_eq!(net_effect(&history), dec!(2050));
    }

    #[test]
    fn test_cancelled_investment_nets_to_zero() {
        let history = [
            entry(TransactionType::Investment, dec!(300)),
            entry(TransactionType::Refund, dec!(300)),
        ];
        assert_eq!(net_effect(&history), dec!(0));
    }
}
