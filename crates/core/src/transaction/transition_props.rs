//! Property-based tests for the transition engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::TransitionError;
use super::transition::{BalanceEffect, TransitionEngine};
use super::types::{TransactionStatus, TransactionType};

fn status_strategy() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Completed),
        Just(TransactionStatus::Failed),
        Just(TransactionStatus::Cancelled),
    ]
}

fn type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Deposit),
        Just(TransactionType::Withdrawal),
        Just(TransactionType::Investment),
        Just(TransactionType::Payout),
        Just(TransactionType::Referral),
        Just(TransactionType::Refund),
        Just(TransactionType::Profit),
    ]
}

/// Positive amounts up to 1,000,000.00 with cent precision.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn fee_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// A transaction in a terminal status never produces a plan, no matter
    /// which transition is requested: duplicate deliveries cannot double-apply
    /// balance effects.
    #[test]
    fn terminal_status_never_replans(
        current in status_strategy(),
        target in status_strategy(),
        tx_type in type_strategy(),
        amount in amount_strategy(),
        fees in fee_strategy(),
    ) {
        prop_assume!(current.is_terminal());
        let result = TransitionEngine::plan(current, target, tx_type, amount, fees);
        prop_assert_eq!(result, Err(TransitionError::AlreadyProcessed { status: current }));
    }

    /// Every plan leaves Pending and lands on a terminal status.
    #[test]
    fn plans_only_reach_terminal_states(
        target in status_strategy(),
        tx_type in type_strategy(),
        amount in amount_strategy(),
        fees in fee_strategy(),
    ) {
        let result = TransitionEngine::plan(
            TransactionStatus::Pending, target, tx_type, amount, fees,
        );
        match result {
            Ok(plan) => {
                prop_assert_eq!(plan.from, TransactionStatus::Pending);
                prop_assert!(plan.to.is_terminal());
            }
            Err(err) => prop_assert_eq!(err, TransitionError::InvalidTransition {
                from: TransactionStatus::Pending,
                to: target,
            }),
        }
    }

    /// Only deposits credit and only withdrawals refund; the refund always
    /// equals the original hold of amount + fees.
    #[test]
    fn effects_match_type(
        target in status_strategy(),
        tx_type in type_strategy(),
        amount in amount_strategy(),
        fees in fee_strategy(),
    ) {
        prop_assume!(target.is_terminal());
        let plan = TransitionEngine::plan(
            TransactionStatus::Pending, target, tx_type, amount, fees,
        ).unwrap();

        match plan.effect {
            BalanceEffect::Credit(credited) => {
                prop_assert_eq!(tx_type, TransactionType::Deposit);
                prop_assert_eq!(target, TransactionStatus::Completed);
                prop_assert_eq!(credited, amount);
            }
            BalanceEffect::RefundHold(refunded) => {
                prop_assert_eq!(tx_type, TransactionType::Withdrawal);
                prop_assert!(target != TransactionStatus::Completed);
                prop_assert_eq!(refunded, amount + fees);
            }
            BalanceEffect::None => {}
        }

        // Referral evaluation is exclusive to confirmed deposits.
        prop_assert_eq!(
            plan.evaluate_referral,
            tx_type == TransactionType::Deposit && target == TransactionStatus::Completed
        );
    }
}
