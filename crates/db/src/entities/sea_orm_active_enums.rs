//! Database enum mappings.
//!
//! Each Postgres enum maps to a `DeriveActiveEnum` here, with lossless
//! conversions to and from the `edgevest-core` domain enums so repositories
//! can hand rows straight to the policy layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use edgevest_core::investment::{InvestmentStatus as CoreInvestmentStatus, RiskLevel as CoreRiskLevel};
use edgevest_core::transaction::{
    TransactionStatus as CoreTransactionStatus, TransactionType as CoreTransactionType,
};

/// `transaction_type` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Funds entering the platform.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Funds leaving the platform.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    /// Principal moved into an investment.
    #[sea_orm(string_value = "investment")]
    Investment,
    /// Matured investment principal + profit.
    #[sea_orm(string_value = "payout")]
    Payout,
    /// Referral bonus credit.
    #[sea_orm(string_value = "referral")]
    Referral,
    /// Reversal of a held or invested amount.
    #[sea_orm(string_value = "refund")]
    Refund,
    /// Administrative profit adjustment.
    #[sea_orm(string_value = "profit")]
    Profit,
}

/// `transaction_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting confirmation.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed and settled.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Execution failed.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Cancelled before execution.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `investment_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "investment_status")]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// Principal locked, accruing.
    #[sea_orm(string_value = "active")]
    Active,
    /// Matured and paid out.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled inside the window.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `risk_level` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "risk_level")]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Conservative packages.
    #[sea_orm(string_value = "low")]
    Low,
    /// Balanced packages.
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Aggressive packages.
    #[sea_orm(string_value = "high")]
    High,
}

/// `account_status` enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account is in good standing.
    #[sea_orm(string_value = "active")]
    Active,
    /// Account is blocked from operations.
    #[sea_orm(string_value = "suspended")]
    Suspended,
    /// Account is soft-closed; accounts are never deleted.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// `actor_type` enum for audit log rows.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "actor_type")]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    /// A platform user.
    #[sea_orm(string_value = "user")]
    User,
    /// A back-office administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// A scheduled job or webhook.
    #[sea_orm(string_value = "system")]
    System,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(value: CoreTransactionType) -> Self {
        match value {
            CoreTransactionType::Deposit => Self::Deposit,
            CoreTransactionType::Withdrawal => Self::Withdrawal,
            CoreTransactionType::Investment => Self::Investment,
            CoreTransactionType::Payout => Self::Payout,
            CoreTransactionType::Referral => Self::Referral,
            CoreTransactionType::Refund => Self::Refund,
            CoreTransactionType::Profit => Self::Profit,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdrawal => Self::Withdrawal,
            TransactionType::Investment => Self::Investment,
            TransactionType::Payout => Self::Payout,
            TransactionType::Referral => Self::Referral,
            TransactionType::Refund => Self::Refund,
            TransactionType::Profit => Self::Profit,
        }
    }
}

impl From<CoreTransactionStatus> for TransactionStatus {
    fn from(value: CoreTransactionStatus) -> Self {
        match value {
            CoreTransactionStatus::Pending => Self::Pending,
            CoreTransactionStatus::Completed => Self::Completed,
            CoreTransactionStatus::Failed => Self::Failed,
            CoreTransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TransactionStatus> for CoreTransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Failed => Self::Failed,
            TransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreInvestmentStatus> for InvestmentStatus {
    fn from(value: CoreInvestmentStatus) -> Self {
        match value {
            CoreInvestmentStatus::Active => Self::Active,
            CoreInvestmentStatus::Completed => Self::Completed,
            CoreInvestmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvestmentStatus> for CoreInvestmentStatus {
    fn from(value: InvestmentStatus) -> Self {
        match value {
            InvestmentStatus::Active => Self::Active,
            InvestmentStatus::Completed => Self::Completed,
            InvestmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreRiskLevel> for RiskLevel {
    fn from(value: CoreRiskLevel) -> Self {
        match value {
            CoreRiskLevel::Low => Self::Low,
            CoreRiskLevel::Medium => Self::Medium,
            CoreRiskLevel::High => Self::High,
        }
    }
}

impl From<RiskLevel> for CoreRiskLevel {
    fn from(value: RiskLevel) -> Self {
        match value {
            RiskLevel::Low => Self::Low,
            RiskLevel::Medium => Self::Medium,
            RiskLevel::High => Self::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_status_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            let core: CoreTransactionStatus = status.clone().into();
            let back: TransactionStatus = core.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_transaction_type_roundtrip() {
        for tx_type in [
            TransactionType::Deposit,
            TransactionType::Withdrawal,
            TransactionType::Investment,
            TransactionType::Payout,
            TransactionType::Referral,
            TransactionType::Refund,
            TransactionType::Profit,
        ] {
            let core: CoreTransactionType = tx_type.clone().into();
            let back: TransactionType = core.into();
            assert_eq!(back, tx_type);
        }
    }
}
