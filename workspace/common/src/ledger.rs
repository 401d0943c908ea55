use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An income line as returned inside a month row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IncomeRow {
    pub source: Option<String>,
    pub person: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// An expense line as returned inside a month row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseRow {
    pub id: i32,
    pub name: String,
    /// Stored category, "Other" when absent.
    pub category: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// A loan balance change as returned inside a month row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanAdjustmentRow {
    pub name: Option<String>,
    /// "disbursement", "payment" or "other".
    pub kind: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub note: Option<String>,
}

/// One fully derived ledger month. `starting_funds` chains from the
/// previous row's `ending_funds`; `loan_remaining` carries the running
/// loan balance adjusted by this month's signed adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthRow {
    pub id: i32,
    /// Human label, e.g. "August 2026".
    pub name: String,
    pub month_date: NaiveDate,
    #[schema(value_type = String)]
    pub starting_funds: Decimal,
    #[schema(value_type = String)]
    pub ending_funds: Decimal,
    #[schema(value_type = String)]
    pub surplus: Decimal,
    #[schema(value_type = String)]
    pub loan_remaining: Decimal,
    pub is_current: bool,
    pub incomes: Vec<IncomeRow>,
    /// Income totals grouped by household member; persons missing on the
    /// income line are grouped under "Unknown".
    #[schema(value_type = std::collections::BTreeMap<String, String>)]
    pub incomes_by_person: BTreeMap<String, Decimal>,
    pub expenses: Vec<ExpenseRow>,
    pub loan_adjustments: Vec<LoanAdjustmentRow>,
}
