//! Transaction domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction type classification.
///
/// The `amount` column always stores an unsigned magnitude; whether it is an
/// inflow or an outflow for the owning account is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Funds entering the platform, pending external confirmation.
    Deposit,
    /// Funds leaving the platform, held at request time.
    Withdrawal,
    /// Principal moved from the balance into an investment.
    Investment,
    /// Principal plus profit returned by a matured investment.
    Payout,
    /// Bonus credited to a referrer.
    Referral,
    /// Reversal of a held or invested amount.
    Refund,
    /// Profit adjustment credited by an administrator.
    Profit,
}

impl TransactionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Investment => "investment",
            Self::Payout => "payout",
            Self::Referral => "referral",
            Self::Refund => "refund",
            Self::Profit => "profit",
        }
    }

    /// Parses a type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            "investment" => Some(Self::Investment),
            "payout" => Some(Self::Payout),
            "referral" => Some(Self::Referral),
            "refund" => Some(Self::Refund),
            "profit" => Some(Self::Profit),
            _ => None,
        }
    }

    /// Returns true if completed transactions of this type add to the
    /// account balance.
    #[must_use]
    pub const fn is_inflow(&self) -> bool {
        matches!(
            self,
            Self::Deposit | Self::Payout | Self::Referral | Self::Refund | Self::Profit
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction status lifecycle.
///
/// A transaction moves from `Pending` to exactly one terminal status:
/// - Pending -> Completed (confirmed by admin or webhook)
/// - Pending -> Failed (execution failed)
/// - Pending -> Cancelled (withdrawn by user or admin)
///
/// Terminal statuses never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting confirmation.
    Pending,
    /// Confirmed and settled (terminal).
    Completed,
    /// Execution failed (terminal).
    Failed,
    /// Cancelled before execution (terminal).
    Cancelled,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment methods accepted for deposits and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bitcoin on-chain transfer.
    Bitcoin,
    /// Ethereum on-chain transfer.
    Ethereum,
    /// USDT transfer.
    Usdt,
    /// Manual bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Usdt => "usdt",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Parses a method from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bitcoin" => Some(Self::Bitcoin),
            "ethereum" => Some(Self::Ethereum),
            "usdt" => Some(Self::Usdt),
            "bank_transfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }

    /// Returns true for on-chain methods that need a generated deposit
    /// address for webhook matching.
    #[must_use]
    pub const fn is_crypto(&self) -> bool {
        !matches!(self, Self::BankTransfer)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity performing a ledger mutation, recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A platform user acting on their own account.
    User(Uuid),
    /// A back-office administrator.
    Admin(Uuid),
    /// A scheduled job or webhook, no human actor.
    System,
}

impl Actor {
    /// Returns the actor category as stored in the audit log.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Admin(_) => "admin",
            Self::System => "system",
        }
    }

    /// Returns the actor id, if the actor is a person.
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        match self {
            Self::User(id) | Self::Admin(id) => Some(*id),
            Self::System => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("PENDING"), Some(TransactionStatus::Pending));
        assert_eq!(TransactionStatus::parse("draft"), None);
    }

    #[test]
    fn test_type_roundtrip() {
        for tx_type in [
            TransactionType::Deposit,
            TransactionType::Withdrawal,
            TransactionType::Investment,
            TransactionType::Payout,
            TransactionType::Referral,
            TransactionType::Refund,
            TransactionType::Profit,
        ] {
            assert_eq!(TransactionType::parse(tx_type.as_str()), Some(tx_type));
        }
        assert_eq!(TransactionType::parse("transfer"), None);
    }

    #[test]
    fn test_flow_direction() {
        assert!(TransactionType::Deposit.is_inflow());
        assert!(TransactionType::Payout.is_inflow());
        assert!(TransactionType::Referral.is_inflow());
        assert!(TransactionType::Refund.is_inflow());
        assert!(!TransactionType::Withdrawal.is_inflow());
        assert!(!TransactionType::Investment.is_inflow());
    }

    #[test]
    fn test_payment_method_crypto() {
        assert!(PaymentMethod::Bitcoin.is_crypto());
        assert!(PaymentMethod::Usdt.is_crypto());
        assert!(!PaymentMethod::BankTransfer.is_crypto());
        assert_eq!(PaymentMethod::parse("bank_transfer"), Some(PaymentMethod::BankTransfer));
    }

    #[test]
    fn test_actor_identity() {
        let id = Uuid::new_v4();
        assert_eq!(Actor::User(id).kind(), "user");
        assert_eq!(Actor::Admin(id).id(), Some(id));
        assert_eq!(Actor::System.kind(), "system");
        assert_eq!(Actor::System.id(), None);
    }
}
