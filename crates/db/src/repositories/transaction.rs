//! Transaction repository: requests, status transitions, and history.
//!
//! Deposits credit nothing until confirmed; withdrawals hold amount + fee at
//! request time. The transition handler locks the transaction row, re-reads
//! its status, and only proceeds from `pending` - a duplicate webhook or
//! admin action surfaces `AlreadyProcessed` instead of double-crediting.
//! Referral bonuses are evaluated inside the same unit of work as the
//! deposit completion and backed by a partial unique index on referral rows.

use chrono::Utc;
use rand::RngCore;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use edgevest_core::ledger::{CompletedEntry, net_effect};
use edgevest_core::referral;
use edgevest_core::settings::PlatformSettings;
use edgevest_core::transaction::{
    Actor, BalanceEffect, PaymentMethod, TransactionStatus as CoreStatus,
    TransactionType as CoreType, TransitionEngine, ensure_user_cancellable, quote_withdrawal,
    validate_deposit,
};
use edgevest_shared::NotificationEvent;
use edgevest_shared::types::{PageRequest, PageResponse};

use super::audit::{AuditEntry, AuditLogRepository};
use super::ledger::LedgerRepository;
use crate::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions, users,
};
use crate::error::StoreError;

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Filter by type.
    pub tx_type: Option<CoreType>,
    /// Filter by status.
    pub status: Option<CoreStatus>,
}

/// Per-user totals over completed transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSummary {
    /// Sum of completed deposits.
    pub total_deposits: Decimal,
    /// Sum of completed withdrawals (excluding fees).
    pub total_withdrawals: Decimal,
    /// Sum of completed investment outflows.
    pub total_investments: Decimal,
    /// Number of transactions still pending.
    pub pending_count: u64,
}

/// Result of a status transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The transaction after the transition.
    pub transaction: transactions::Model,
    /// Events to hand to the notification worker after commit.
    pub events: Vec<NotificationEvent>,
}

/// Outcome of a webhook deposit confirmation.
#[derive(Debug, Clone)]
pub enum DepositConfirmation {
    /// Not enough confirmations yet; acknowledge and wait for redelivery.
    AwaitingConfirmations {
        /// Confirmations required before crediting.
        required: i64,
    },
    /// No pending deposit matches the address - already processed or
    /// unknown. Safe to acknowledge.
    NoMatch,
    /// The deposit was completed and credited.
    Completed(TransitionOutcome),
}

/// Comparison of a user's balance against their completed history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Balance implied by the completed transaction history.
    pub computed: Decimal,
    /// Balance currently on the account row.
    pub actual: Decimal,
}

impl ReconciliationReport {
    /// True when the ledger reconciles exactly.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.computed == self.actual
    }
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Request creation
    // ========================================================================

    /// Creates a pending deposit request.
    ///
    /// No funds move here; crediting happens at confirmation. Crypto methods
    /// get a generated one-time deposit address for webhook matching.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the user does not exist.
    pub async fn create_deposit_request(
        &self,
        user_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
        settings: &PlatformSettings,
    ) -> Result<transactions::Model, StoreError> {
        validate_deposit(amount, settings).map_err(StoreError::Request)?;

        let txn = self.db.begin().await?;

        users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::UserNotFound(user_id))?;

        let wallet_address = payment_method.is_crypto().then(generate_deposit_address);
        let transaction = insert_transaction(
            &txn,
            NewTransaction {
                user_id,
                tx_type: TransactionType::Deposit,
                amount,
                status: TransactionStatus::Pending,
                description: format!("Deposit via {payment_method}"),
                reference_id: None,
                payment_method: Some(payment_method.to_string()),
                wallet_address,
                fees: Decimal::ZERO,
            },
        )
        .await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(
                Actor::User(user_id),
                "deposit_request",
                "transaction",
                Some(transaction.id),
            )
            .with_new(serde_json::json!({
                "amount": amount,
                "payment_method": payment_method.as_str(),
            })),
        )
        .await?;

        txn.commit().await?;
        info!(user_id = %user_id, transaction_id = %transaction.id, %amount, "deposit request created");
        Ok(transaction)
    }

    /// Creates a pending withdrawal request and immediately holds
    /// amount + fee.
    ///
    /// The hold is why failed and cancelled withdrawals refund: the debit
    /// already happened here.
    ///
    /// # Errors
    ///
    /// Returns an error for amounts below the minimum or balances that
    /// cannot cover amount + fee.
    pub async fn create_withdrawal_request(
        &self,
        user_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
        destination: Option<String>,
        settings: &PlatformSettings,
    ) -> Result<(transactions::Model, NotificationEvent), StoreError> {
        let txn = self.db.begin().await?;

        // Balance is read under the row lock; a concurrent withdrawal on the
        // same account serializes behind it.
        let user = LedgerRepository::lock_account(&txn, user_id).await?;
        let quote = quote_withdrawal(amount, settings, user.account_balance)
            .map_err(StoreError::Request)?;

        let email = user.email.clone();
        let first_name = user.first_name.clone();
        let sheet = LedgerRepository::sheet_of(&user).debit(quote.total_debit)?;
        LedgerRepository::write_sheet(&txn, user, sheet).await?;

        let transaction = insert_transaction(
            &txn,
            NewTransaction {
                user_id,
                tx_type: TransactionType::Withdrawal,
                amount,
                status: TransactionStatus::Pending,
                description: format!("Withdrawal via {payment_method}"),
                reference_id: None,
                payment_method: Some(payment_method.to_string()),
                wallet_address: destination,
                fees: quote.fee,
            },
        )
        .await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(
                Actor::User(user_id),
                "withdrawal_request",
                "transaction",
                Some(transaction.id),
            )
            .with_new(serde_json::json!({
                "amount": amount,
                "fee": quote.fee,
                "payment_method": payment_method.as_str(),
            })),
        )
        .await?;

        txn.commit().await?;
        info!(user_id = %user_id, transaction_id = %transaction.id, %amount, fee = %quote.fee, "withdrawal request created, funds held");

        let event = NotificationEvent::WithdrawalRequested {
            email,
            first_name,
            amount,
            fee: quote.fee,
            payment_method: payment_method.to_string(),
            transaction_id: transaction.id,
        };
        Ok((transaction, event))
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// Moves a transaction from pending to a terminal status, applying the
    /// balance side-effects and referral bonus in one atomic unit of work.
    ///
    /// Driven by admin actions; webhooks go through
    /// [`Self::confirm_deposit_by_address`].
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` for duplicate deliveries (safe no-op for
    /// the caller) and `InvalidTransition` for illegal moves.
    pub async fn transition_status(
        &self,
        transaction_id: Uuid,
        target: CoreStatus,
        actor: Actor,
        notes: Option<String>,
        transaction_hash: Option<String>,
        settings: &PlatformSettings,
    ) -> Result<TransitionOutcome, StoreError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(StoreError::TransactionNotFound(transaction_id))?;

        let (updated, events) =
            apply_transition(&txn, transaction, target, actor, notes, transaction_hash, settings)
                .await?;

        txn.commit().await?;
        Ok(TransitionOutcome {
            transaction: updated,
            events,
        })
    }

    /// Webhook entry point: confirms a pending crypto deposit matched by its
    /// one-time address.
    ///
    /// The recorded amount is updated to what actually arrived on-chain
    /// before the standard completion path credits it.
    ///
    /// # Errors
    ///
    /// Returns an error only for system faults; unmatched or
    /// under-confirmed payloads are acknowledged via the outcome enum.
    pub async fn confirm_deposit_by_address(
        &self,
        wallet_address: &str,
        amount: Decimal,
        confirmations: i64,
        transaction_hash: &str,
        settings: &PlatformSettings,
    ) -> Result<DepositConfirmation, StoreError> {
        if confirmations < settings.min_crypto_confirmations {
            return Ok(DepositConfirmation::AwaitingConfirmations {
                required: settings.min_crypto_confirmations,
            });
        }

        let txn = self.db.begin().await?;

        // Lock the matching row so a second webhook for the same deposit
        // waits here and then sees a terminal status.
        let Some(transaction) = transactions::Entity::find()
            .filter(transactions::Column::WalletAddress.eq(wallet_address))
            .filter(transactions::Column::Type.eq(TransactionType::Deposit))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(DepositConfirmation::NoMatch);
        };

        // Record what actually arrived, then credit exactly that.
        let mut active: transactions::ActiveModel = transaction.into();
        active.amount = Set(amount);
        let transaction = active.update(&txn).await?;

        let (updated, events) = apply_transition(
            &txn,
            transaction,
            CoreStatus::Completed,
            Actor::System,
            None,
            Some(transaction_hash.to_string()),
            settings,
        )
        .await?;

        txn.commit().await?;
        info!(transaction_id = %updated.id, %amount, confirmations, "crypto deposit confirmed");
        Ok(DepositConfirmation::Completed(TransitionOutcome {
            transaction: updated,
            events,
        }))
    }

    /// User-initiated cancellation of their own pending request, allowed
    /// within one hour of creation. Withdrawal cancellations release the
    /// hold through the standard transition path.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for rows the user does not own,
    /// `AlreadyProcessed` for terminal rows, and `CancellationWindowExpired`
    /// outside the window.
    pub async fn cancel_pending(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
        settings: &PlatformSettings,
    ) -> Result<TransitionOutcome, StoreError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(StoreError::TransactionNotFound(transaction_id))?;

        ensure_user_cancellable(transaction.created_at.into(), Utc::now())
            .map_err(StoreError::Request)?;

        let (updated, events) = apply_transition(
            &txn,
            transaction,
            CoreStatus::Cancelled,
            Actor::User(user_id),
            None,
            None,
            settings,
        )
        .await?;

        txn.commit().await?;
        Ok(TransitionOutcome {
            transaction: updated,
            events,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Finds a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no row exists.
    pub async fn find_by_id(
        &self,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, StoreError> {
        transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::TransactionNotFound(transaction_id))
    }

    /// Finds a transaction owned by a specific user.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no row exists or the user does not
    /// own it.
    pub async fn find_for_user(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
    ) -> Result<transactions::Model, StoreError> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::TransactionNotFound(transaction_id))
    }

    /// Lists a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<transactions::Model>, StoreError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));

        if let Some(tx_type) = filter.tx_type {
            query = query.filter(transactions::Column::Type.eq(TransactionType::from(tx_type)));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(TransactionStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(items, total, page))
    }

    /// Per-user totals over completed transactions plus the pending count.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn summary_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<TransactionSummary, StoreError> {
        let total_deposits = self
            .completed_sum(user_id, TransactionType::Deposit)
            .await?;
        let total_withdrawals = self
            .completed_sum(user_id, TransactionType::Withdrawal)
            .await?;
        let total_investments = self
            .completed_sum(user_id, TransactionType::Investment)
            .await?;

        let pending_count = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .count(&self.db)
            .await?;

        Ok(TransactionSummary {
            total_deposits,
            total_withdrawals,
            total_investments,
            pending_count,
        })
    }

    async fn completed_sum(
        &self,
        user_id: Uuid,
        tx_type: TransactionType,
    ) -> Result<Decimal, StoreError> {
        let sum: Option<Option<Decimal>> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Amount.sum(), "total")
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Type.eq(tx_type))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(sum.flatten().unwrap_or(Decimal::ZERO))
    }

    /// Compares a user's balance against the net effect of their completed
    /// transaction history. Accounts start at zero, so the two must match
    /// exactly for a consistent ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the user or history cannot be read.
    pub async fn reconcile_balance(
        &self,
        user_id: Uuid,
    ) -> Result<ReconciliationReport, StoreError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::UserNotFound(user_id))?;

        let completed = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .all(&self.db)
            .await?;

        let entries: Vec<CompletedEntry> = completed
            .iter()
            .map(|row| CompletedEntry {
                tx_type: row.r#type.clone().into(),
                amount: row.amount,
                fees: row.fees,
            })
            .collect();

        Ok(ReconciliationReport {
            computed: net_effect(&entries),
            actual: user.account_balance,
        })
    }
}

// ============================================================================
// Internals
// ============================================================================

struct NewTransaction {
    user_id: Uuid,
    tx_type: TransactionType,
    amount: Decimal,
    status: TransactionStatus,
    description: String,
    reference_id: Option<Uuid>,
    payment_method: Option<String>,
    wallet_address: Option<String>,
    fees: Decimal,
}

async fn insert_transaction(
    txn: &DatabaseTransaction,
    input: NewTransaction,
) -> Result<transactions::Model, StoreError> {
    let now = Utc::now().into();
    let model = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        r#type: Set(input.tx_type),
        amount: Set(input.amount),
        currency: Set("USD".to_string()),
        status: Set(input.status),
        description: Set(Some(input.description)),
        reference_id: Set(input.reference_id),
        payment_method: Set(input.payment_method),
        wallet_address: Set(input.wallet_address),
        transaction_hash: Set(None),
        notes: Set(None),
        fees: Set(input.fees),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(txn).await?)
}

/// One-time deposit address for webhook matching.
fn generate_deposit_address() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill_bytes(&mut bytes);
    format!("dep_{}", hex::encode(bytes))
}

/// Applies a validated transition to an already-locked transaction row:
/// status update, balance side-effect, referral bonus, audit entry. Runs
/// entirely inside the caller's unit of work.
async fn apply_transition(
    txn: &DatabaseTransaction,
    transaction: transactions::Model,
    target: CoreStatus,
    actor: Actor,
    notes: Option<String>,
    transaction_hash: Option<String>,
    settings: &PlatformSettings,
) -> Result<(transactions::Model, Vec<NotificationEvent>), StoreError> {
    let current: CoreStatus = transaction.status.clone().into();
    let tx_type: CoreType = transaction.r#type.clone().into();

    let plan = TransitionEngine::plan(current, target, tx_type, transaction.amount, transaction.fees)
        .map_err(StoreError::Transition)?;

    let transaction_id = transaction.id;
    let user_id = transaction.user_id;
    let amount = transaction.amount;

    let mut active: transactions::ActiveModel = transaction.into();
    active.status = Set(TransactionStatus::from(target));
    if let Some(hash) = &transaction_hash {
        active.transaction_hash = Set(Some(hash.clone()));
    }
    if let Some(notes) = &notes {
        active.notes = Set(Some(notes.clone()));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(txn).await?;

    let mut events = Vec::new();

    let owner = match plan.effect {
        BalanceEffect::None => None,
        BalanceEffect::Credit(credit) => {
            Some(LedgerRepository::credit(txn, user_id, credit).await?)
        }
        BalanceEffect::RefundHold(hold) => {
            info!(transaction_id = %transaction_id, refund = %hold, "withdrawal hold released");
            Some(LedgerRepository::credit(txn, user_id, hold).await?)
        }
    };

    if tx_type == CoreType::Deposit && target == CoreStatus::Completed {
        if let Some(owner) = &owner {
            events.push(NotificationEvent::DepositConfirmed {
                email: owner.email.clone(),
                first_name: owner.first_name.clone(),
                amount,
                transaction_id,
            });
        }
    }

    if plan.evaluate_referral {
        award_referral_bonus(txn, &updated, owner.as_ref(), actor, settings).await?;
    }

    AuditLogRepository::append(
        txn,
        AuditEntry::new(actor, "transaction_status_update", "transaction", Some(transaction_id))
            .with_old(serde_json::json!({ "status": plan.from }))
            .with_new(serde_json::json!({
                "status": plan.to,
                "transaction_hash": transaction_hash,
                "notes": notes,
            })),
    )
    .await?;

    Ok((updated, events))
}

/// Evaluates and applies the referral bonus for a just-completed deposit.
///
/// The count-based first-deposit check runs after the row was marked
/// completed in this unit of work; the partial unique index on referral rows
/// makes the award impossible to duplicate even under concurrent
/// confirmations.
async fn award_referral_bonus(
    txn: &DatabaseTransaction,
    deposit: &transactions::Model,
    owner: Option<&users::Model>,
    actor: Actor,
    settings: &PlatformSettings,
) -> Result<(), StoreError> {
    let Some(owner) = owner else {
        return Ok(());
    };

    let completed_deposits = transactions::Entity::find()
        .filter(transactions::Column::UserId.eq(deposit.user_id))
        .filter(transactions::Column::Type.eq(TransactionType::Deposit))
        .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
        .count(txn)
        .await?;

    let Some(award) = referral::evaluate(
        deposit.amount,
        completed_deposits,
        owner.referred_by,
        settings.referral_bonus_percentage,
    ) else {
        return Ok(());
    };

    // Exactly-once guard: one referral row per referred user, enforced by
    // uq_transactions_referral_once as well.
    let already_awarded = transactions::Entity::find()
        .filter(transactions::Column::Type.eq(TransactionType::Referral))
        .filter(transactions::Column::ReferenceId.eq(deposit.user_id))
        .count(txn)
        .await?;
    if already_awarded > 0 {
        warn!(referred_user = %deposit.user_id, "referral bonus already awarded, skipping");
        return Ok(());
    }

    LedgerRepository::credit(txn, award.referrer, award.amount).await?;

    let bonus = insert_transaction(
        txn,
        NewTransaction {
            user_id: award.referrer,
            tx_type: TransactionType::Referral,
            amount: award.amount,
            status: TransactionStatus::Completed,
            description: format!("Referral bonus from user {}", deposit.user_id),
            reference_id: Some(deposit.user_id),
            payment_method: None,
            wallet_address: None,
            fees: Decimal::ZERO,
        },
    )
    .await?;

    AuditLogRepository::append(
        txn,
        AuditEntry::new(actor, "referral_bonus_award", "transaction", Some(bonus.id)).with_new(
            serde_json::json!({
                "referrer_id": award.referrer,
                "referred_user_id": deposit.user_id,
                "bonus_amount": award.amount,
            }),
        ),
    )
    .await?;

    info!(referrer = %award.referrer, referred_user = %deposit.user_id, amount = %award.amount, "referral bonus awarded");
    Ok(())
}
