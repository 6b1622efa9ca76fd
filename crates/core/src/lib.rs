//! Core business logic for Edgevest.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the store layer applies the decisions inside atomic units of work.
//!
//! # Modules
//!
//! - `ledger` - Balance arithmetic and reconciliation
//! - `transaction` - Transaction status state machine and request policies
//! - `investment` - Investment package validation and lifecycle rules
//! - `referral` - Referral bonus eligibility and calculation
//! - `settings` - Runtime platform settings

pub mod investment;
pub mod ledger;
pub mod referral;
pub mod settings;
pub mod transaction;
