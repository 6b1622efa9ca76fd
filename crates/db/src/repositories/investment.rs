//! Investment repository: creation, cancellation, and maturity payout.
//!
//! Terms are fixed at creation: `expected_return` and `end_date` are copied
//! from the package quote and never recomputed. The maturity path guards on
//! `status = active` under lock, so re-running a batch over the same
//! investment is a no-op.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use edgevest_core::investment::{InvestmentError, InvestmentPolicy, InvestmentStatus as CoreStatus};
use edgevest_core::transaction::Actor;
use edgevest_shared::NotificationEvent;
use edgevest_shared::types::{PageRequest, PageResponse};

use super::audit::{AuditEntry, AuditLogRepository};
use super::ledger::LedgerRepository;
use super::package::terms_of;
use crate::entities::{
    investment_packages, investments,
    sea_orm_active_enums::{InvestmentStatus, TransactionStatus, TransactionType},
    transactions,
};
use crate::error::StoreError;

/// Filter options for listing investments.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestmentFilter {
    /// Filter by status.
    pub status: Option<CoreStatus>,
}

/// Per-user investment totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestmentSummary {
    /// Number of investments ever made.
    pub total_investments: u64,
    /// Number still active.
    pub active_investments: u64,
    /// Sum of principal across all investments.
    pub total_invested: Decimal,
}

/// Result of paying out one matured investment.
#[derive(Debug, Clone)]
pub struct MaturityPayout {
    /// The completed investment.
    pub investment: investments::Model,
    /// Principal + profit credited to the owner.
    pub payout: Decimal,
    /// Event for the notification worker.
    pub event: NotificationEvent,
}

/// Investment repository.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
}

impl InvestmentRepository {
    /// Creates a new investment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an investment: validates the package quote, debits the
    /// principal, and records the investment row plus its completed
    /// transaction, all in one atomic unit of work.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound`, `PackageInactive`, `InvalidAmount`, or
    /// `InsufficientBalance`.
    pub async fn create(
        &self,
        user_id: Uuid,
        package_id: Uuid,
        amount: Decimal,
    ) -> Result<(investments::Model, NotificationEvent), StoreError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let user = LedgerRepository::lock_account(&txn, user_id).await?;

        let package = investment_packages::Entity::find_by_id(package_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::Investment(InvestmentError::PackageNotFound(
                package_id,
            )))?;

        let quote = InvestmentPolicy::quote(&terms_of(&package), amount, now)
            .map_err(StoreError::Investment)?;

        let email = user.email.clone();
        let first_name = user.first_name.clone();
        let sheet = LedgerRepository::sheet_of(&user).invest(amount)?;
        LedgerRepository::write_sheet(&txn, user, sheet).await?;

        let investment = investments::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            package_id: Set(package_id),
            amount: Set(amount),
            expected_return: Set(quote.expected_return),
            current_value: Set(amount),
            status: Set(InvestmentStatus::Active),
            start_date: Set(now.into()),
            end_date: Set(quote.end_date.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        insert_investment_transaction(
            &txn,
            user_id,
            TransactionType::Investment,
            amount,
            format!("Investment in {}", package.name),
            investment.id,
        )
        .await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(
                Actor::User(user_id),
                "investment_create",
                "investment",
                Some(investment.id),
            )
            .with_new(serde_json::json!({
                "package_id": package_id,
                "amount": amount,
                "expected_return": quote.expected_return,
                "end_date": quote.end_date,
            })),
        )
        .await?;

        txn.commit().await?;
        info!(user_id = %user_id, investment_id = %investment.id, %amount, "investment created");

        let event = NotificationEvent::InvestmentOpened {
            email,
            first_name,
            package_name: package.name,
            amount,
            expected_return: quote.expected_return,
            end_date: quote.end_date,
        };
        Ok((investment, event))
    }

    /// Cancels an active investment within the 24-hour window: refunds the
    /// principal, reverses `total_invested`, and records a completed refund
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for rows the user does not own and
    /// `NotCancellable` outside the window or for terminal investments.
    pub async fn cancel(
        &self,
        investment_id: Uuid,
        user_id: Uuid,
    ) -> Result<investments::Model, StoreError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let investment = investments::Entity::find_by_id(investment_id)
            .filter(investments::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(StoreError::Investment(InvestmentError::NotFound(
                investment_id,
            )))?;

        InvestmentPolicy::ensure_cancellable(
            investment.status.clone().into(),
            investment.created_at.into(),
            now,
        )
        .map_err(StoreError::Investment)?;

        let principal = investment.amount;

        let mut active: investments::ActiveModel = investment.into();
        active.status = Set(InvestmentStatus::Cancelled);
        active.updated_at = Set(now.into());
        let cancelled = active.update(&txn).await?;

        let user = LedgerRepository::lock_account(&txn, user_id).await?;
        let sheet = LedgerRepository::sheet_of(&user).refund_investment(principal)?;
        LedgerRepository::write_sheet(&txn, user, sheet).await?;

        insert_investment_transaction(
            &txn,
            user_id,
            TransactionType::Refund,
            principal,
            "Refund for cancelled investment".to_string(),
            investment_id,
        )
        .await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(
                Actor::User(user_id),
                "investment_cancel",
                "investment",
                Some(investment_id),
            )
            .with_old(serde_json::json!({ "status": CoreStatus::Active }))
            .with_new(serde_json::json!({ "status": CoreStatus::Cancelled, "refund": principal })),
        )
        .await?;

        txn.commit().await?;
        info!(user_id = %user_id, investment_id = %investment_id, refund = %principal, "investment cancelled");
        Ok(cancelled)
    }

    /// Active investments whose term has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_matured(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<investments::Model>, StoreError> {
        let matured = investments::Entity::find()
            .filter(investments::Column::Status.eq(InvestmentStatus::Active))
            .filter(investments::Column::EndDate.lte(now))
            .order_by_asc(investments::Column::EndDate)
            .all(&self.db)
            .await?;

        Ok(matured)
    }

    /// Pays out one matured investment in its own atomic unit of work.
    ///
    /// Returns `None` when the row is no longer an active matured investment
    /// (already paid out by a previous run, or cancelled): the guard makes
    /// the maturity batch idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; the whole payout rolls back.
    pub async fn complete_matured(
        &self,
        investment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<MaturityPayout>, StoreError> {
        let txn = self.db.begin().await?;

        let Some(investment) = investments::Entity::find_by_id(investment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        // Idempotency guard: only active rows past their end date qualify.
        if !InvestmentPolicy::is_matured(
            investment.status.clone().into(),
            investment.end_date.into(),
            now,
        ) {
            return Ok(None);
        }

        let payout = InvestmentPolicy::payout(investment.amount, investment.expected_return);
        let principal = investment.amount;
        let profit = investment.expected_return;
        let user_id = investment.user_id;
        let package_id = investment.package_id;

        let mut active: investments::ActiveModel = investment.into();
        active.status = Set(InvestmentStatus::Completed);
        active.current_value = Set(payout);
        active.updated_at = Set(now.into());
        let completed = active.update(&txn).await?;

        let user = LedgerRepository::lock_account(&txn, user_id).await?;
        let email = user.email.clone();
        let first_name = user.first_name.clone();
        let sheet = LedgerRepository::sheet_of(&user).payout(principal, profit)?;
        LedgerRepository::write_sheet(&txn, user, sheet).await?;

        let package_name = investment_packages::Entity::find_by_id(package_id)
            .one(&txn)
            .await?
            .map_or_else(|| "investment package".to_string(), |package| package.name);

        insert_investment_transaction(
            &txn,
            user_id,
            TransactionType::Payout,
            payout,
            format!("Payout for completed investment in {package_name}"),
            investment_id,
        )
        .await?;

        // System action: the scheduler has no human actor.
        AuditLogRepository::append(
            &txn,
            AuditEntry::new(
                Actor::System,
                "investment_matured",
                "investment",
                Some(investment_id),
            )
            .with_new(serde_json::json!({
                "payout_amount": payout,
                "user_id": user_id,
            })),
        )
        .await?;

        txn.commit().await?;
        info!(user_id = %user_id, investment_id = %investment_id, %payout, "matured investment paid out");

        Ok(Some(MaturityPayout {
            investment: completed,
            payout,
            event: NotificationEvent::InvestmentMatured {
                email,
                first_name,
                package_name,
                payout,
                investment_id,
            },
        }))
    }

    /// Lists a user's investments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: InvestmentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<investments::Model>, StoreError> {
        let mut query =
            investments::Entity::find().filter(investments::Column::UserId.eq(user_id));

        if let Some(status) = filter.status {
            query = query.filter(investments::Column::Status.eq(InvestmentStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(investments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(items, total, page))
    }

    /// Per-user investment totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn summary_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<InvestmentSummary, StoreError> {
        let total_investments = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        let active_investments = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id))
            .filter(investments::Column::Status.eq(InvestmentStatus::Active))
            .count(&self.db)
            .await?;

        let total_invested: Option<Option<Decimal>> = investments::Entity::find()
            .select_only()
            .column_as(investments::Column::Amount.sum(), "total")
            .filter(investments::Column::UserId.eq(user_id))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(InvestmentSummary {
            total_investments,
            active_investments,
            total_invested: total_invested.flatten().unwrap_or(Decimal::ZERO),
        })
    }
}

/// Inserts the completed transaction row that accompanies an investment
/// lifecycle step (open, refund, payout).
async fn insert_investment_transaction(
    txn: &sea_orm::DatabaseTransaction,
    user_id: Uuid,
    tx_type: TransactionType,
    amount: Decimal,
    description: String,
    investment_id: Uuid,
) -> Result<transactions::Model, StoreError> {
    let now = Utc::now().into();
    let model = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        r#type: Set(tx_type),
        amount: Set(amount),
        currency: Set("USD".to_string()),
        status: Set(TransactionStatus::Completed),
        description: Set(Some(description)),
        reference_id: Set(Some(investment_id)),
        payment_method: Set(None),
        wallet_address: Set(None),
        transaction_hash: Set(None),
        notes: Set(None),
        fees: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(txn).await?)
}
