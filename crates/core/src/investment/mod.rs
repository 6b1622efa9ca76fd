//! Investment package validation and lifecycle rules.
//!
//! This module implements:
//! - Investment status and package risk enums
//! - Quoting a new investment against a package (bounds, return, term)
//! - The 24-hour cancellation window
//! - Maturity eligibility and payout arithmetic

pub mod error;
pub mod policy;
pub mod types;

pub use error::InvestmentError;
pub use policy::{CANCELLATION_WINDOW_HOURS, InvestmentPolicy};
pub use types::{InvestmentQuote, InvestmentStatus, PackageTerms, RiskLevel};
