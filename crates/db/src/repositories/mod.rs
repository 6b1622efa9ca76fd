//! Repository abstractions for data access.
//!
//! Each repository owns the atomic units of work for one aggregate. The
//! pattern is always the same: begin, lock the rows the decision depends on,
//! delegate the decision to `edgevest-core`, persist every side-effect,
//! append the audit entry, commit. Nothing best-effort (email) happens
//! inside a unit of work; repositories return `NotificationEvent`s instead.

pub mod audit;
pub mod investment;
pub mod ledger;
pub mod package;
pub mod settings;
pub mod transaction;
pub mod user;

pub use audit::AuditLogRepository;
pub use investment::InvestmentRepository;
pub use ledger::LedgerRepository;
pub use package::PackageRepository;
pub use settings::SettingsRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
