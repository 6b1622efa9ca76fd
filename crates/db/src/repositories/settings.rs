//! System settings repository.
//!
//! Runtime platform settings are key/value rows edited by administrators.
//! `load` produces the typed `PlatformSettings` view consumed by the core
//! policies; operations receive it as a value, never through global state.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, Set, TransactionTrait,
    sea_query::OnConflict,
};

use edgevest_core::settings::PlatformSettings;
use edgevest_core::transaction::Actor;

use super::audit::{AuditEntry, AuditLogRepository};
use crate::entities::system_settings;
use crate::error::StoreError;

/// System settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the typed platform settings.
    ///
    /// Missing or malformed rows fall back to defaults; a bad admin edit
    /// degrades to the default value instead of failing operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn load(&self) -> Result<PlatformSettings, StoreError> {
        let rows = system_settings::Entity::find().all(&self.db).await?;
        Ok(PlatformSettings::from_pairs(
            rows.into_iter().map(|row| (row.setting_key, row.setting_value)),
        ))
    }

    /// Reads one raw setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = system_settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|row| row.setting_value))
    }

    /// Upserts one setting and audit-logs the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set(&self, key: &str, value: &str, actor: Actor) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        let previous = system_settings::Entity::find_by_id(key.to_string())
            .one(&txn)
            .await?
            .map(|row| row.setting_value);

        let model = system_settings::ActiveModel {
            setting_key: Set(key.to_string()),
            setting_value: Set(value.to_string()),
            description: ActiveValue::NotSet,
            updated_at: Set(Utc::now().into()),
        };

        system_settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(system_settings::Column::SettingKey)
                    .update_columns([
                        system_settings::Column::SettingValue,
                        system_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(actor, "system_setting_update", "system_setting", None)
                .with_old(serde_json::json!({ "key": key, "value": previous }))
                .with_new(serde_json::json!({ "key": key, "value": value })),
        )
        .await?;

        txn.commit().await?;
        Ok(())
    }
}
