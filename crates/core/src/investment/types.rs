//! Investment domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Investment status lifecycle.
///
/// - Active -> Completed: by the maturity processor, only past `end_date`
/// - Active -> Cancelled: by the owner, within the cancellation window
///
/// Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// Principal is locked and accruing toward the fixed return.
    Active,
    /// Matured and paid out (terminal).
    Completed,
    /// Cancelled inside the window, principal refunded (terminal).
    Cancelled,
}

impl InvestmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Package risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Conservative packages.
    Low,
    /// Balanced packages.
    Medium,
    /// Aggressive packages.
    High,
}

impl RiskLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a level from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The terms of an investment package as they stand at quote time.
///
/// Terms are copied onto the investment at creation (`expected_return`,
/// `end_date`); later edits to the package never change running investments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTerms {
    /// Package id.
    pub id: Uuid,
    /// Display name, copied into transaction descriptions.
    pub name: String,
    /// Smallest accepted principal.
    pub min_amount: Decimal,
    /// Largest accepted principal.
    pub max_amount: Decimal,
    /// Return rate over the full term, in percent.
    pub return_rate: Decimal,
    /// Term length in days.
    pub duration_days: i64,
    /// Whether new investments are accepted.
    pub is_active: bool,
}

/// Fixed terms of a new investment, computed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestmentQuote {
    /// Profit fixed at creation: amount x return_rate / 100.
    pub expected_return: Decimal,
    /// Maturity date: creation time + package duration.
    pub end_date: DateTime<Utc>,
}
