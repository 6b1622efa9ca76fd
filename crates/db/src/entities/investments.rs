//! `SeaORM` Entity for the investments table.
//!
//! `expected_return` and `end_date` are fixed at creation. Only the maturity
//! processor moves an investment from active to completed, and only past
//! `end_date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InvestmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub amount: Decimal,
    pub expected_return: Decimal,
    pub current_value: Decimal,
    pub status: InvestmentStatus,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
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
    #[sea_orm(
        belongs_to = "super::investment_packages::Entity",
        from = "Column::PackageId",
        to = "super::investment_packages::Column::Id"
    )]
    InvestmentPackages,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::investment_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentPackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
