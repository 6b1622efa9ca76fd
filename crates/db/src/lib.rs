//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Repositories drive every ledger mutation as one atomic unit of work:
//! begin, lock the rows the decision depends on, delegate the decision to
//! `edgevest-core`, persist, commit. Any error rolls the whole unit back.

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::StoreError;
pub use repositories::{
    AuditLogRepository, InvestmentRepository, LedgerRepository, PackageRepository,
    SettingsRepository, TransactionRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
