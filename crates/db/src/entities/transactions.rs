//! `SeaORM` Entity for the transactions table.
//!
//! `amount` is an unsigned magnitude; direction is implied by `r#type`.
//! Rows are never deleted and transition status at most once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionStatus, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub description: Option<String>,
    /// Correlates to the entity that caused this row: the investment for
    /// investment/payout/refund rows, the referred user for referral rows.
    pub reference_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub wallet_address: Option<String>,
    pub transaction_hash: Option<String>,
    pub notes: Option<String>,
    pub fees: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
