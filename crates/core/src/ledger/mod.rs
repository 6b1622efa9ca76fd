//! Balance arithmetic and reconciliation.
//!
//! This module implements the ledger primitives:
//! - Account balance snapshots and credit/debit arithmetic
//! - Investment-related balance moves (invest, refund, payout)
//! - Reconciliation of completed transaction history against a balance
//!
//! The store layer reads a `BalanceSheet` under a row lock, applies one of
//! these pure operations, and persists the result in the same atomic unit of
//! work.

pub mod balance;
pub mod error;
pub mod reconciliation;

#[cfg(test)]
mod reconciliation_props;

pub use balance::BalanceSheet;
pub use error::LedgerError;
pub use reconciliation::{CompletedEntry, net_effect};
