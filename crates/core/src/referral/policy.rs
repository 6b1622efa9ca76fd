//! Referral bonus policy.
//!
//! Evaluated only from the deposit pending -> completed transition, after the
//! deposit row has been marked completed inside the same atomic unit of work.
//! A referred account earns its referrer a bonus at most once, on its first
//! completed deposit. The store additionally enforces uniqueness with a
//! partial unique index on referral transactions, so a concurrent duplicate
//! evaluation cannot insert a second bonus row.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::transaction::request::percentage_of;

/// A bonus to credit to a referrer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusAward {
    /// The account receiving the bonus.
    pub referrer: Uuid,
    /// Bonus amount: deposit x bonus% / 100, rounded to cents.
    pub amount: Decimal,
}

/// Decides whether a completed deposit triggers a referral bonus.
///
/// `completed_deposit_count` counts the depositor's completed deposits
/// *including* the row that was just marked completed; exactly 1 means this
/// was their first. Returns `None` when no bonus is due.
#[must_use]
pub fn evaluate(
    deposit_amount: Decimal,
    completed_deposit_count: u64,
    referred_by: Option<Uuid>,
    bonus_percentage: Decimal,
) -> Option<BonusAward> {
    if completed_deposit_count != 1 {
        return None;
    }
    let referrer = referred_by?;
    if bonus_percentage <= Decimal::ZERO {
        return None;
    }

    let amount = percentage_of(deposit_amount, bonus_percentage);
    if amount <= Decimal::ZERO {
        return None;
    }

    Some(BonusAward { referrer, amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_deposit_awards_bonus() {
        let referrer = Uuid::new_v4();
        let award = evaluate(dec!(1000), 1, Some(referrer), dec!(5)).unwrap();
        assert_eq!(award.referrer, referrer);
        assert_eq!(award.amount, dec!(50));
    }

    #[test]
    fn test_second_deposit_awards_nothing() {
        assert_eq!(evaluate(dec!(1000), 2, Some(Uuid::new_v4()), dec!(5)), None);
    }

    #[test]
    fn test_no_referrer_awards_nothing() {
        assert_eq!(evaluate(dec!(1000), 1, None, dec!(5)), None);
    }

    #[test]
    fn test_zero_percentage_disables_bonus() {
        assert_eq!(evaluate(dec!(1000), 1, Some(Uuid::new_v4()), dec!(0)), None);
        assert_eq!(evaluate(dec!(1000), 1, Some(Uuid::new_v4()), dec!(-5)), None);
    }

    #[test]
    fn test_bonus_rounds_to_cents() {
        // $333.33 at 5% = $16.6665 -> $16.67
        let award = evaluate(dec!(333.33), 1, Some(Uuid::new_v4()), dec!(5)).unwrap();
        assert_eq!(award.amount, dec!(16.67));
    }

    #[test]
    fn test_vanishing_bonus_awards_nothing() {
        // Rounds to $0.00 -> no award, no zero-amount transaction row.
        assert_eq!(evaluate(dec!(0.01), 1, Some(Uuid::new_v4()), dec!(0.5)), None);
    }

    #[test]
    fn test_zero_completed_deposits_awards_nothing() {
        // Count 0 means the current row was not completed in this unit of
        // work; the engine must not be evaluated on that path.
        assert_eq!(evaluate(dec!(1000), 0, Some(Uuid::new_v4()), dec!(5)), None);
    }
}
