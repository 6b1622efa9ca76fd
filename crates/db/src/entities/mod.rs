//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod investment_packages;
pub mod investments;
pub mod sea_orm_active_enums;
pub mod system_settings;
pub mod transactions;
pub mod users;
