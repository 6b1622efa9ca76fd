//! Property-based tests for balance conservation.
//!
//! Simulates random sequences of ledger operations on one account and checks
//! that the final balance equals the initial balance plus the net effect of
//! the completed transaction history - no drift, for any sequence.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::BalanceSheet;
use super::reconciliation::{CompletedEntry, net_effect};
use crate::transaction::types::TransactionType;

/// One simulated ledger operation.
#[derive(Debug, Clone, Copy)]
enum Op {
    /// Deposit confirmed: credit + completed deposit row.
    DepositCompleted(Decimal),
    /// Withdrawal requested and executed: hold then confirm.
    WithdrawalCompleted { amount: Decimal, fee: Decimal },
    /// Withdrawal requested then failed: hold then refund, no completed row.
    WithdrawalFailed { amount: Decimal, fee: Decimal },
    /// Investment opened: debit + completed investment row.
    InvestmentOpened(Decimal),
    /// Investment opened then cancelled inside the window.
    InvestmentCancelled(Decimal),
    /// Investment opened then matured with profit.
    InvestmentMatured { principal: Decimal, profit: Decimal },
}

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn fee() -> impl Strategy<Value = Decimal> {
    (0i64..5_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        amount().prop_map(Op::DepositCompleted),
        (amount(), fee()).prop_map(|(amount, fee)| Op::WithdrawalCompleted { amount, fee }),
        (amount(), fee()).prop_map(|(amount, fee)| Op::WithdrawalFailed { amount, fee }),
        amount().prop_map(Op::InvestmentOpened),
        amount().prop_map(Op::InvestmentCancelled),
        (amount(), fee()).prop_map(|(principal, profit)| Op::InvestmentMatured {
            principal,
            profit
        }),
    ]
}

/// Applies one operation; records completed transaction rows exactly as the
/// store layer would. Operations that the ledger rejects (insufficient
/// balance) leave both the sheet and the history untouched.
fn apply(sheet: BalanceSheet, op: Op, history: &mut Vec<CompletedEntry>) -> BalanceSheet {
    match op {
        Op::DepositCompleted(amount) => match sheet.credit(amount) {
            Ok(next) => {
                history.push(CompletedEntry {
                    tx_type: TransactionType::Deposit,
                    amount,
                    fees: Decimal::ZERO,
                });
                next
            }
            Err(_) => sheet,
        },
        Op::WithdrawalCompleted { amount, fee } => {
            // Hold at request time; completion confirms without moving funds.
            match sheet.debit(amount + fee) {
                Ok(next) => {
                    history.push(CompletedEntry {
                        tx_type: TransactionType::Withdrawal,
                        amount,
                        fees: fee,
                    });
                    next
                }
                Err(_) => sheet,
            }
        }
        Op::WithdrawalFailed { amount, fee } => {
            // Hold then refund; the row ends failed, not completed.
            match sheet.debit(amount + fee) {
                Ok(held) => held
                    .credit(amount + fee)
                    .expect("refund of a positive hold cannot fail"),
                Err(_) => sheet,
            }
        }
        Op::InvestmentOpened(principal) => match sheet.invest(principal) {
            Ok(next) => {
                history.push(CompletedEntry {
                    tx_type: TransactionType::Investment,
                    amount: principal,
                    fees: Decimal::ZERO,
                });
                next
            }
            Err(_) => sheet,
        },
        Op::InvestmentCancelled(principal) => match sheet.invest(principal) {
            Ok(invested) => {
                history.push(CompletedEntry {
                    tx_type: TransactionType::Investment,
                    amount: principal,
                    fees: Decimal::ZERO,
                });
                let refunded = invested
                    .refund_investment(principal)
                    .expect("refund of a positive principal cannot fail");
                history.push(CompletedEntry {
                    tx_type: TransactionType::Refund,
                    amount: principal,
                    fees: Decimal::ZERO,
                });
                refunded
            }
            Err(_) => sheet,
        },
        Op::InvestmentMatured { principal, profit } => match sheet.invest(principal) {
            Ok(invested) => {
                history.push(CompletedEntry {
                    tx_type: TransactionType::Investment,
                    amount: principal,
                    fees: Decimal::ZERO,
                });
                let paid = invested
                    .payout(principal, profit)
                    .expect("payout of a positive principal cannot fail");
                history.push(CompletedEntry {
                    tx_type: TransactionType::Payout,
                    amount: principal + profit,
                    fees: Decimal::ZERO,
                });
                paid
            }
            Err(_) => sheet,
        },
    }
}

proptest! {
    /// Balance conservation: final balance = initial + net effect of the
    /// completed history, for any operation sequence.
    #[test]
    fn balance_reconciles_with_history(
        initial_cents in 0i64..1_000_000i64,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let initial = Decimal::new(initial_cents, 2);
        let mut sheet = BalanceSheet::new(initial, Decimal::ZERO, Decimal::ZERO);
        let mut history = Vec::new();

        for op in ops {
            sheet = apply(sheet, op, &mut history);
        }

        prop_assert_eq!(sheet.account_balance, initial + net_effect(&history));
    }

    /// The spendable balance never goes negative, whatever the sequence.
    #[test]
    fn balance_never_negative(
        initial_cents in 0i64..1_000_000i64,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let initial = Decimal::new(initial_cents, 2);
        let mut sheet = BalanceSheet::new(initial, Decimal::ZERO, Decimal::ZERO);
        let mut history = Vec::new();

        for op in ops {
            sheet = apply(sheet, op, &mut history);
            prop_assert!(sheet.account_balance >= Decimal::ZERO);
        }
    }
}
