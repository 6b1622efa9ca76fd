//! User repository.
//!
//! Registration, sessions and authentication live outside this crate; the
//! user row here is the ledger account created alongside registration.
//! Accounts are soft-closed via `account_status` and never deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use edgevest_core::transaction::Actor;

use super::audit::{AuditEntry, AuditLogRepository};
use crate::entities::{sea_orm_active_enums::AccountStatus, users};
use crate::error::StoreError;

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Unique email address.
    pub email: String,
    /// First name, used in notifications.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Referring account, if the user signed up through a referral link.
    pub referred_by: Option<Uuid>,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user account with zeroed balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate email).
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, StoreError> {
        let now = Utc::now().into();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            account_balance: Set(Decimal::ZERO),
            total_invested: Set(Decimal::ZERO),
            total_profit: Set(Decimal::ZERO),
            account_status: Set(AccountStatus::Active),
            referred_by: Set(input.referred_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no row exists.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<users::Model, StoreError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::UserNotFound(user_id))
    }

    /// Updates the account status (suspend, close, reactivate) and
    /// audit-logs the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
        actor: Actor,
    ) -> Result<users::Model, StoreError> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::UserNotFound(user_id))?;
        let old_status = user.account_status.clone();

        let mut active: users::ActiveModel = user.into();
        active.account_status = Set(status.clone());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(actor, "user_status_update", "user", Some(user_id))
                .with_old(serde_json::json!({ "account_status": old_status }))
                .with_new(serde_json::json!({ "account_status": status })),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }
}
