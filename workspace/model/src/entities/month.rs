use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// One row of the household ledger. The stored balance columns are
/// derived values; the ledger rollforward recomputes them from the
/// child rows and rewrites them when they drift.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "months")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// First day of the month; rows are processed in ascending order.
    pub month_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub starting_funds: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub ending_funds: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub surplus: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub loan_remaining: Decimal,
    #[sea_orm(default_value = "false")]
    pub is_current: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::income::Entity")]
    Income,
    #[sea_orm(has_many = "super::expense::Entity")]
    Expense,
    #[sea_orm(has_many = "super::loan_adjustment::Entity")]
    LoanAdjustment,
}

impl Related<super::income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Income.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::loan_adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanAdjustment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
