//! Audit log repository.
//!
//! The audit trail is append-only. Writes happen inside the same unit of
//! work as the mutation they describe; there is no update or delete path.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use edgevest_core::transaction::Actor;

use crate::entities::{audit_logs, sea_orm_active_enums::ActorType};
use crate::error::StoreError;

/// A record to append to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Who performed the action.
    pub actor: Actor,
    /// Action name, e.g. `transaction_status_update`.
    pub action: String,
    /// Entity category, e.g. `transaction`.
    pub entity_type: String,
    /// Entity id, if the action targets one row.
    pub entity_id: Option<Uuid>,
    /// State before the action.
    pub old_values: Option<Value>,
    /// State after the action.
    pub new_values: Option<Value>,
}

impl AuditEntry {
    /// Creates an entry with no captured values.
    #[must_use]
    pub fn new(actor: Actor, action: &str, entity_type: &str, entity_id: Option<Uuid>) -> Self {
        Self {
            actor,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            old_values: None,
            new_values: None,
        }
    }

    /// Attaches the before-state.
    #[must_use]
    pub fn with_old(mut self, values: Value) -> Self {
        self.old_values = Some(values);
        self
    }

    /// Attaches the after-state.
    #[must_use]
    pub fn with_new(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an entry inside an open unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; the caller's unit of work rolls
    /// back with it.
    pub async fn append(
        txn: &DatabaseTransaction,
        entry: AuditEntry,
    ) -> Result<audit_logs::Model, StoreError> {
        let actor_type = match entry.actor {
            Actor::User(_) => ActorType::User,
            Actor::Admin(_) => ActorType::Admin,
            Actor::System => ActorType::System,
        };

        let model = audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            actor_type: Set(actor_type),
            actor_id: Set(entry.actor.id()),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            old_values: Set(entry.old_values),
            new_values: Set(entry.new_values),
            created_at: Set(Utc::now().into()),
        };

        Ok(model.insert(txn).await?)
    }

    /// Lists entries for one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<audit_logs::Model>, StoreError> {
        let entries = audit_logs::Entity::find()
            .filter(audit_logs::Column::EntityType.eq(entity_type))
            .filter(audit_logs::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_logs::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(entries)
    }
}
