//! Account balance snapshot and arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Snapshot of the mutable balance fields of an account.
///
/// A sheet is read under a row lock, transformed by exactly one of the
/// operations below, and written back in the same atomic unit of work.
/// Every operation is value-preserving: it returns a new sheet and leaves
/// the input untouched on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Spendable balance. Never negative.
    pub account_balance: Decimal,
    /// Principal currently locked in active investments.
    pub total_invested: Decimal,
    /// Lifetime profit paid out by matured investments.
    pub total_profit: Decimal,
}

impl BalanceSheet {
    /// Creates a sheet from the three persisted columns.
    #[must_use]
    pub const fn new(
        account_balance: Decimal,
        total_invested: Decimal,
        total_profit: Decimal,
    ) -> Self {
        Self {
            account_balance,
            total_invested,
            total_profit,
        }
    }

    /// Credits the spendable balance.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts.
    pub fn credit(self, amount: Decimal) -> Result<Self, LedgerError> {
        ensure_positive(amount)?;
        Ok(Self {
            account_balance: self.account_balance + amount,
            ..self
        })
    }

    /// Debits the spendable balance after a sufficiency check.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts and debits exceeding the balance.
    pub fn debit(self, amount: Decimal) -> Result<Self, LedgerError> {
        ensure_positive(amount)?;
        if self.account_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: self.account_balance,
                required: amount,
            });
        }
        Ok(Self {
            account_balance: self.account_balance - amount,
            ..self
        })
    }

    /// Moves principal from the balance into active investments.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::debit`].
    pub fn invest(self, principal: Decimal) -> Result<Self, LedgerError> {
        let debited = self.debit(principal)?;
        Ok(Self {
            total_invested: debited.total_invested + principal,
            ..debited
        })
    }

    /// Returns principal of a cancelled investment to the balance.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts.
    pub fn refund_investment(self, principal: Decimal) -> Result<Self, LedgerError> {
        let credited = self.credit(principal)?;
        Ok(Self {
            total_invested: credited.total_invested - principal,
            ..credited
        })
    }

    /// Pays out a matured investment: principal + profit return to the
    /// balance, the principal leaves `total_invested`, and the profit is
    /// added to the lifetime total.
    ///
    /// # Errors
    ///
    /// Rejects non-positive principal. Zero profit is permitted (a package
    /// with a 0% return rate).
    pub fn payout(self, principal: Decimal, profit: Decimal) -> Result<Self, LedgerError> {
        ensure_positive(principal)?;
        if profit < Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(profit));
        }
        Ok(Self {
            account_balance: self.account_balance + principal + profit,
            total_invested: self.total_invested - principal,
            total_profit: self.total_profit + profit,
        })
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sheet(balance: Decimal) -> BalanceSheet {
        BalanceSheet::new(balance, dec!(0), dec!(0))
    }

    #[test]
    fn test_credit() {
        let result = sheet(dec!(100)).credit(dec!(50)).unwrap();
        assert_eq!(result.account_balance, dec!(150));
    }

    #[test]
    fn test_credit_rejects_non_positive() {
        assert_eq!(
            sheet(dec!(100)).credit(dec!(0)),
            Err(LedgerError::NonPositiveAmount(dec!(0)))
        );
        assert_eq!(
            sheet(dec!(100)).credit(dec!(-1)),
            Err(LedgerError::NonPositiveAmount(dec!(-1)))
        );
    }

    #[test]
    fn test_debit_with_sufficient_balance() {
        let result = sheet(dec!(100)).debit(dec!(100)).unwrap();
        assert_eq!(result.account_balance, dec!(0));
    }

    #[test]
    fn test_debit_insufficient_balance() {
        assert_eq!(
            sheet(dec!(99.99)).debit(dec!(100)),
            Err(LedgerError::InsufficientBalance {
                available: dec!(99.99),
                required: dec!(100),
            })
        );
    }

    #[test]
    fn test_invest_moves_principal() {
        let result = sheet(dec!(2000)).invest(dec!(500)).unwrap();
        assert_eq!(result.account_balance, dec!(1500));
        assert_eq!(result.total_invested, dec!(500));
    }

    #[test]
    fn test_refund_investment_reverses_invest() {
        let invested = sheet(dec!(2000)).invest(dec!(500)).unwrap();
        let refunded = invested.refund_investment(dec!(500)).unwrap();
        assert_eq!(refunded, sheet(dec!(2000)));
    }

    #[test]
    fn test_payout_returns_principal_and_profit() {
        let invested = sheet(dec!(2000)).invest(dec!(500)).unwrap();
        let paid = invested.payout(dec!(500), dec!(50)).unwrap();
        assert_eq!(paid.account_balance, dec!(2050));
        assert_eq!(paid.total_invested, dec!(0));
        assert_eq!(paid.total_profit, dec!(50));
    }

    #[test]
    fn test_payout_with_zero_profit() {
        let invested = sheet(dec!(1000)).invest(dec!(100)).unwrap();
        let paid = invested.payout(dec!(100), dec!(0)).unwrap();
        assert_eq!(paid.account_balance, dec!(1000));
        assert_eq!(paid.total_profit, dec!(0));
    }

    #[test]
    fn test_payout_rejects_negative_profit() {
        assert!(sheet(dec!(100)).payout(dec!(50), dec!(-1)).is_err());
    }

    #[test]
    fn test_failed_operation_leaves_input_untouched() {
        let original = sheet(dec!(10));
        let _ = original.debit(dec!(100));
        assert_eq!(original, sheet(dec!(10)));
    }
}
