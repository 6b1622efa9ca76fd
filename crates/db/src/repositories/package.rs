//! Investment package repository.
//!
//! Admin-managed catalog of packages. Edits change what future investments
//! are offered; the terms of existing investments were copied at creation
//! and are never touched from here.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use edgevest_core::investment::{InvestmentError, PackageTerms};
use edgevest_core::transaction::Actor;

use super::audit::{AuditEntry, AuditLogRepository};
use crate::entities::{investment_packages, sea_orm_active_enums::RiskLevel};
use crate::error::StoreError;

/// Input for creating or updating a package.
#[derive(Debug, Clone)]
pub struct PackageInput {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Smallest accepted principal.
    pub min_amount: Decimal,
    /// Largest accepted principal.
    pub max_amount: Decimal,
    /// Return rate over the full term, in percent.
    pub return_rate: Decimal,
    /// Term length in days.
    pub duration_days: i32,
    /// Risk classification.
    pub risk_level: RiskLevel,
}

/// Converts a package row into the terms view the core policy consumes.
#[must_use]
pub fn terms_of(package: &investment_packages::Model) -> PackageTerms {
    PackageTerms {
        id: package.id,
        name: package.name.clone(),
        min_amount: package.min_amount,
        max_amount: package.max_amount,
        return_rate: package.return_rate,
        duration_days: i64::from(package.duration_days),
        is_active: package.is_active,
    }
}

/// Investment package repository.
#[derive(Debug, Clone)]
pub struct PackageRepository {
    db: DatabaseConnection,
}

impl PackageRepository {
    /// Creates a new package repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a package by id.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if no row exists.
    pub async fn find_by_id(
        &self,
        package_id: Uuid,
    ) -> Result<investment_packages::Model, StoreError> {
        investment_packages::Entity::find_by_id(package_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::Investment(InvestmentError::PackageNotFound(
                package_id,
            )))
    }

    /// Lists packages, optionally restricted to active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        active_only: bool,
    ) -> Result<Vec<investment_packages::Model>, StoreError> {
        let mut query = investment_packages::Entity::find()
            .order_by_asc(investment_packages::Column::MinAmount);

        if active_only {
            query = query.filter(investment_packages::Column::IsActive.eq(true));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Creates a package and audit-logs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        input: PackageInput,
        actor: Actor,
    ) -> Result<investment_packages::Model, StoreError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let model = investment_packages::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            min_amount: Set(input.min_amount),
            max_amount: Set(input.max_amount),
            return_rate: Set(input.return_rate),
            duration_days: Set(input.duration_days),
            risk_level: Set(input.risk_level.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(&txn).await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(actor, "package_create", "investment_package", Some(created.id))
                .with_new(serde_json::json!({
                    "name": input.name,
                    "min_amount": input.min_amount,
                    "max_amount": input.max_amount,
                    "return_rate": input.return_rate,
                    "duration_days": input.duration_days,
                })),
        )
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Updates a package's offered terms and audit-logs the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the package does not exist or the update fails.
    pub async fn update(
        &self,
        package_id: Uuid,
        input: PackageInput,
        actor: Actor,
    ) -> Result<investment_packages::Model, StoreError> {
        let txn = self.db.begin().await?;

        let package = investment_packages::Entity::find_by_id(package_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::Investment(InvestmentError::PackageNotFound(
                package_id,
            )))?;

        let old_values = serde_json::json!({
            "name": package.name,
            "min_amount": package.min_amount,
            "max_amount": package.max_amount,
            "return_rate": package.return_rate,
            "duration_days": package.duration_days,
        });

        let mut active: investment_packages::ActiveModel = package.into();
        active.name = Set(input.name.clone());
        active.description = Set(input.description.clone());
        active.min_amount = Set(input.min_amount);
        active.max_amount = Set(input.max_amount);
        active.return_rate = Set(input.return_rate);
        active.duration_days = Set(input.duration_days);
        active.risk_level = Set(input.risk_level.clone());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(actor, "package_update", "investment_package", Some(package_id))
                .with_old(old_values)
                .with_new(serde_json::json!({
                    "name": input.name,
                    "min_amount": input.min_amount,
                    "max_amount": input.max_amount,
                    "return_rate": input.return_rate,
                    "duration_days": input.duration_days,
                })),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Opens or closes a package for new investments.
    ///
    /// # Errors
    ///
    /// Returns an error if the package does not exist or the update fails.
    pub async fn set_active(
        &self,
        package_id: Uuid,
        is_active: bool,
        actor: Actor,
    ) -> Result<investment_packages::Model, StoreError> {
        let txn = self.db.begin().await?;

        let package = investment_packages::Entity::find_by_id(package_id)
            .one(&txn)
            .await?
            .ok_or(StoreError::Investment(InvestmentError::PackageNotFound(
                package_id,
            )))?;
        let was_active = package.is_active;

        let mut active: investment_packages::ActiveModel = package.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        AuditLogRepository::append(
            &txn,
            AuditEntry::new(actor, "package_set_active", "investment_package", Some(package_id))
                .with_old(serde_json::json!({ "is_active": was_active }))
                .with_new(serde_json::json!({ "is_active": is_active })),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }
}
