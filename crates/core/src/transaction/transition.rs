//! The transaction status state machine.
//!
//! A transaction moves from `Pending` to exactly one terminal status. The
//! engine validates the move and computes the balance side-effect the store
//! layer must apply in the same atomic unit of work:
//!
//! - deposit Pending -> Completed: credit the amount, then evaluate the
//!   referral bonus
//! - withdrawal Pending -> Completed: no balance change (funds were held at
//!   request time)
//! - withdrawal Pending -> Failed/Cancelled: refund the held amount + fees
//! - deposit Pending -> Failed/Cancelled: no balance change (nothing was
//!   credited)
//!
//! Re-delivery of a transition for an already-terminal transaction yields
//! `AlreadyProcessed`, which callers treat as an acknowledge-and-skip no-op.

use rust_decimal::Decimal;

use super::error::TransitionError;
use super::types::{TransactionStatus, TransactionType};

/// Balance side-effect of a status transition, applied to the transaction's
/// owner inside the same atomic unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// No balance change.
    None,
    /// Credit the account (confirmed deposit).
    Credit(Decimal),
    /// Return a hold taken at request time (failed/cancelled withdrawal,
    /// amount + fees).
    RefundHold(Decimal),
}

/// A validated transition with its side-effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Status the transaction is leaving.
    pub from: TransactionStatus,
    /// Status the transaction is entering.
    pub to: TransactionStatus,
    /// Balance mutation to apply atomically with the status update.
    pub effect: BalanceEffect,
    /// Whether the referral bonus engine must be evaluated after the
    /// transition is applied.
    pub evaluate_referral: bool,
}

/// Stateless service validating and planning status transitions.
pub struct TransitionEngine;

impl TransitionEngine {
    /// Checks whether a (from, to) pair is a legal transition.
    ///
    /// The only legal moves are Pending -> {Completed, Failed, Cancelled}.
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        from == TransactionStatus::Pending && to.is_terminal()
    }

    /// Validates a transition and computes its side-effects.
    ///
    /// `amount` and `fees` are the values stored on the transaction row,
    /// read under lock in the same unit of work that will apply the plan.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` when the transaction is already terminal
    /// (duplicate delivery) and `InvalidTransition` for any other illegal
    /// pair.
    pub fn plan(
        current: TransactionStatus,
        target: TransactionStatus,
        tx_type: TransactionType,
        amount: Decimal,
        fees: Decimal,
    ) -> Result<TransitionPlan, TransitionError> {
        if current.is_terminal() {
            return Err(TransitionError::AlreadyProcessed { status: current });
        }
        if !Self::is_valid_transition(current, target) {
            return Err(TransitionError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        let effect = match (tx_type, target) {
            (TransactionType::Deposit, TransactionStatus::Completed) => {
                BalanceEffect::Credit(amount)
            }
            (
                TransactionType::Withdrawal,
                TransactionStatus::Failed | TransactionStatus::Cancelled,
            ) => BalanceEffect::RefundHold(amount + fees),
            // Withdrawal completion only confirms execution of the hold;
            // every other type is created already-terminal and carries no
            // default side-effect here.
            _ => BalanceEffect::None,
        };

        Ok(TransitionPlan {
            from: current,
            to: target,
            effect,
            evaluate_referral: tx_type == TransactionType::Deposit
                && target == TransactionStatus::Completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_completion_credits_amount() {
        let plan = TransitionEngine::plan(
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionType::Deposit,
            dec!(1000),
            dec!(0),
        )
        .unwrap();
        assert_eq!(plan.effect, BalanceEffect::Credit(dec!(1000)));
        assert!(plan.evaluate_referral);
    }

    #[test]
    fn test_deposit_failure_has_no_effect() {
        for target in [TransactionStatus::Failed, TransactionStatus::Cancelled] {
            let plan = TransitionEngine::plan(
                TransactionStatus::Pending,
                target,
                TransactionType::Deposit,
                dec!(1000),
                dec!(0),
            )
            .unwrap();
            assert_eq!(plan.effect, BalanceEffect::None);
            assert!(!plan.evaluate_referral);
        }
    }

    #[test]
    fn test_withdrawal_completion_has_no_effect() {
        let plan = TransitionEngine::plan(
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionType::Withdrawal,
            dec!(100),
            dec!(0.50),
        )
        .unwrap();
        assert_eq!(plan.effect, BalanceEffect::None);
        assert!(!plan.evaluate_referral);
    }

    #[test]
    fn test_withdrawal_failure_refunds_amount_plus_fees() {
        for target in [TransactionStatus::Failed, TransactionStatus::Cancelled] {
            let plan = TransitionEngine::plan(
                TransactionStatus::Pending,
                target,
                TransactionType::Withdrawal,
                dec!(100),
                dec!(0.50),
            )
            .unwrap();
            assert_eq!(plan.effect, BalanceEffect::RefundHold(dec!(100.50)));
        }
    }

    #[test]
    fn test_terminal_statuses_are_final() {
        for current in [
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            let result = TransitionEngine::plan(
                current,
                TransactionStatus::Completed,
                TransactionType::Deposit,
                dec!(1000),
                dec!(0),
            );
            assert_eq!(
                result,
                Err(TransitionError::AlreadyProcessed { status: current })
            );
        }
    }

    #[test]
    fn test_pending_to_pending_is_invalid() {
        let result = TransitionEngine::plan(
            TransactionStatus::Pending,
            TransactionStatus::Pending,
            TransactionType::Deposit,
            dec!(1000),
            dec!(0),
        );
        assert_eq!(
            result,
            Err(TransitionError::InvalidTransition {
                from: TransactionStatus::Pending,
                to: TransactionStatus::Pending,
            })
        );
    }

    #[test]
    fn test_other_types_transition_without_effect() {
        // Payout/refund/referral rows are created already-completed; if one
        // is somehow pending, resolving it must not touch the balance.
        for tx_type in [
            TransactionType::Payout,
            TransactionType::Referral,
            TransactionType::Refund,
            TransactionType::Investment,
            TransactionType::Profit,
        ] {
            let plan = TransitionEngine::plan(
                TransactionStatus::Pending,
                TransactionStatus::Completed,
                tx_type,
                dec!(42),
                dec!(0),
            )
            .unwrap();
            assert_eq!(plan.effect, BalanceEffect::None);
            assert!(!plan.evaluate_referral);
        }
    }

    #[test]
    fn test_is_valid_transition_table() {
        use TransactionStatus as S;
        assert!(TransitionEngine::is_valid_transition(S::Pending, S::Completed));
        assert!(TransitionEngine::is_valid_transition(S::Pending, S::Failed));
        assert!(TransitionEngine::is_valid_transition(S::Pending, S::Cancelled));
        assert!(!TransitionEngine::is_valid_transition(S::Pending, S::Pending));
        assert!(!TransitionEngine::is_valid_transition(S::Completed, S::Failed));
        assert!(!TransitionEngine::is_valid_transition(S::Failed, S::Pending));
        assert!(!TransitionEngine::is_valid_transition(S::Cancelled, S::Completed));
    }
}
