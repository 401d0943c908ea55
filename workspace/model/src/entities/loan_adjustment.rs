use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Direction of a loan balance change within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AdjustmentKind {
    /// New money drawn; increases the remaining balance.
    #[sea_orm(string_value = "disbursement")]
    Disbursement,
    /// Repayment; decreases the remaining balance.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Recorded for bookkeeping but ignored by the rollforward.
    #[sea_orm(string_value = "other")]
    Other,
}

/// A signed change to the running loan balance, attached to a month.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub month_id: i32,
    pub name: Option<String>,
    pub kind: AdjustmentKind,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::month::Entity",
        from = "Column::MonthId",
        to = "super::month::Column::Id",
        on_delete = "Cascade"
    )]
    Month,
}

impl Related<super::month::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Month.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
