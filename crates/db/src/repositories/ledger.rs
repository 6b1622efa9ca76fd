//! Ledger primitives: row-locked balance reads and writes.
//!
//! These helpers run inside an already-open database transaction. The
//! account row is locked with `SELECT ... FOR UPDATE` before the balance is
//! read, so two concurrent units of work on the same user serialize and a
//! stale-read overdraft is impossible. Operations on different users proceed
//! independently.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, EntityTrait, QuerySelect, Set,
};
use uuid::Uuid;

use edgevest_core::ledger::BalanceSheet;

use crate::entities::users;
use crate::error::StoreError;

/// Stateless ledger helpers over an open unit of work.
pub struct LedgerRepository;

impl LedgerRepository {
    /// Locks the user row for update and returns it.
    ///
    /// Every balance decision in the same unit of work must happen after
    /// this lock is taken.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist.
    pub async fn lock_account(
        txn: &DatabaseTransaction,
        user_id: Uuid,
    ) -> Result<users::Model, StoreError> {
        users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(StoreError::UserNotFound(user_id))
    }

    /// Reads the balance fields of a locked user row.
    #[must_use]
    pub const fn sheet_of(user: &users::Model) -> BalanceSheet {
        BalanceSheet::new(user.account_balance, user.total_invested, user.total_profit)
    }

    /// Persists a balance sheet back onto the user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn write_sheet(
        txn: &DatabaseTransaction,
        user: users::Model,
        sheet: BalanceSheet,
    ) -> Result<users::Model, StoreError> {
        let mut active: users::ActiveModel = user.into();
        active.account_balance = Set(sheet.account_balance);
        active.total_invested = Set(sheet.total_invested);
        active.total_profit = Set(sheet.total_profit);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(txn).await?)
    }

    /// Locks the account and credits the spendable balance.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` or a ledger arithmetic error.
    pub async fn credit(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<users::Model, StoreError> {
        let user = Self::lock_account(txn, user_id).await?;
        let sheet = Self::sheet_of(&user).credit(amount)?;
        Self::write_sheet(txn, user, sheet).await
    }

    /// Locks the account and debits the spendable balance.
    ///
    /// The sufficiency check runs against the balance read under the lock,
    /// in the same unit of work that will commit the debit.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `InsufficientBalance`, or a database error.
    pub async fn debit(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<users::Model, StoreError> {
        let user = Self::lock_account(txn, user_id).await?;
        let sheet = Self::sheet_of(&user).debit(amount)?;
        Self::write_sheet(txn, user, sheet).await
    }
}
