//! Month rollforward: derives surplus and balance chains over the ledger
//! months in ascending date order, and collects a write-set for rows whose
//! stored values drifted from the recomputed ones.
//!
//! The computation is pure; persistence is a separate, optional
//! [`reconcile`] step so read-only callers can skip it. Re-running the
//! computation on unchanged input always converges to the same values, so
//! a lost reconcile write is simply corrected on the next read.

use std::collections::{BTreeMap, HashMap};

use common::{ExpenseRow, IncomeRow, LoanAdjustmentRow, MonthRow};
use model::entities::{expense, financing, income, loan_adjustment, month};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
    TransactionTrait,
};
use tracing::{debug, instrument};

use crate::error::Result;
use loan_adjustment::AdjustmentKind;

/// Financing entry that seeds the first month's loan balance.
pub const LOANS_TAKEN: &str = "loans_taken";

/// A month row together with its child rows, loaded up front so the
/// rollforward itself touches no I/O.
#[derive(Debug, Clone)]
pub struct MonthWithItems {
    pub month: month::Model,
    pub incomes: Vec<income::Model>,
    pub expenses: Vec<expense::Model>,
    pub loan_adjustments: Vec<loan_adjustment::Model>,
}

/// Stored columns of one month that drifted from the recomputed values.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCorrection {
    pub month_id: i32,
    pub starting_funds: Decimal,
    pub ending_funds: Decimal,
    pub surplus: Decimal,
    pub loan_remaining: Decimal,
}

/// Output of the pure rollforward: derived rows for every month plus the
/// corrections a mutating caller may persist.
#[derive(Debug, Clone)]
pub struct LedgerResult {
    pub rows: Vec<MonthRow>,
    pub corrections: Vec<MonthCorrection>,
}

fn month_label(m: &month::Model) -> String {
    m.month_date.format("%B %Y").to_string()
}

fn loan_delta(adjustment: &loan_adjustment::Model) -> Decimal {
    match adjustment.kind {
        AdjustmentKind::Disbursement => adjustment.amount,
        AdjustmentKind::Payment => -adjustment.amount,
        AdjustmentKind::Other => Decimal::ZERO,
    }
}

/// Rolls the months forward in the given order (callers load ascending by
/// `month_date`).
///
/// For month 0 the stored `starting_funds` is authoritative and the loan
/// balance is seeded from the `loans_taken` financing entry when present.
/// Every later month chains from the previous month's computed values.
pub fn compute_ledger(
    months: &[MonthWithItems],
    financing_map: &HashMap<String, Decimal>,
) -> LedgerResult {
    let mut rows = Vec::with_capacity(months.len());
    let mut corrections = Vec::new();

    let mut prev_ending = Decimal::ZERO;
    let mut prev_loan = Decimal::ZERO;

    for (idx, entry) in months.iter().enumerate() {
        let m = &entry.month;

        let total_income: Decimal = entry.incomes.iter().map(|i| i.amount).sum();
        let total_expenses: Decimal = entry.expenses.iter().map(|e| e.amount).sum();
        let surplus = total_income - total_expenses;

        let starting_funds = if idx == 0 {
            m.starting_funds
        } else {
            prev_ending
        };

        let seeded_loan = if idx == 0 {
            financing_map
                .get(LOANS_TAKEN)
                .copied()
                .unwrap_or(m.loan_remaining)
        } else {
            prev_loan
        };
        let adjustment_sum: Decimal = entry.loan_adjustments.iter().map(loan_delta).sum();
        let loan_remaining = seeded_loan + adjustment_sum;

        let ending_funds = starting_funds + surplus;

        let drifted = (idx != 0 && m.starting_funds != starting_funds)
            || m.ending_funds != ending_funds
            || m.surplus != surplus
            || m.loan_remaining != loan_remaining;
        if drifted {
            corrections.push(MonthCorrection {
                month_id: m.id,
                starting_funds,
                ending_funds,
                surplus,
                loan_remaining,
            });
        }

        let incomes: Vec<IncomeRow> = entry
            .incomes
            .iter()
            .map(|i| IncomeRow {
                source: i.source.clone(),
                person: i.person.clone(),
                amount: i.amount,
            })
            .collect();

        let mut incomes_by_person: BTreeMap<String, Decimal> = BTreeMap::new();
        for item in &incomes {
            let key = item.person.clone().unwrap_or_else(|| "Unknown".to_string());
            *incomes_by_person.entry(key).or_insert(Decimal::ZERO) += item.amount;
        }

        let expenses: Vec<ExpenseRow> = entry
            .expenses
            .iter()
            .map(|e| ExpenseRow {
                id: e.id,
                name: e.name.clone().unwrap_or_default(),
                category: e
                    .category
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "Other".to_string()),
                amount: e.amount,
            })
            .collect();

        let loan_adjustments: Vec<LoanAdjustmentRow> = entry
            .loan_adjustments
            .iter()
            .map(|a| LoanAdjustmentRow {
                name: a.name.clone(),
                kind: match a.kind {
                    AdjustmentKind::Disbursement => "disbursement",
                    AdjustmentKind::Payment => "payment",
                    AdjustmentKind::Other => "other",
                }
                .to_string(),
                amount: a.amount,
                note: a.note.clone(),
            })
            .collect();

        rows.push(MonthRow {
            id: m.id,
            name: month_label(m),
            month_date: m.month_date,
            starting_funds,
            ending_funds,
            surplus,
            loan_remaining,
            is_current: m.is_current,
            incomes,
            incomes_by_person,
            expenses,
            loan_adjustments,
        });

        prev_ending = ending_funds;
        prev_loan = loan_remaining;
    }

    LedgerResult { rows, corrections }
}

/// Loads every month in ascending date order together with its child rows.
#[instrument(skip(db))]
pub async fn load_months_with_items(db: &DatabaseConnection) -> Result<Vec<MonthWithItems>> {
    let months = month::Entity::find()
        .order_by_asc(month::Column::MonthDate)
        .all(db)
        .await?;

    let mut incomes_by_month: HashMap<i32, Vec<income::Model>> = HashMap::new();
    for row in income::Entity::find().all(db).await? {
        incomes_by_month.entry(row.month_id).or_default().push(row);
    }

    let mut expenses_by_month: HashMap<i32, Vec<expense::Model>> = HashMap::new();
    for row in expense::Entity::find().all(db).await? {
        expenses_by_month.entry(row.month_id).or_default().push(row);
    }

    let mut adjustments_by_month: HashMap<i32, Vec<loan_adjustment::Model>> = HashMap::new();
    for row in loan_adjustment::Entity::find().all(db).await? {
        adjustments_by_month.entry(row.month_id).or_default().push(row);
    }

    Ok(months
        .into_iter()
        .map(|m| {
            let id = m.id;
            MonthWithItems {
                month: m,
                incomes: incomes_by_month.remove(&id).unwrap_or_default(),
                expenses: expenses_by_month.remove(&id).unwrap_or_default(),
                loan_adjustments: adjustments_by_month.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

/// Loads the financing entries as a name -> value map.
#[instrument(skip(db))]
pub async fn load_financing_map(db: &DatabaseConnection) -> Result<HashMap<String, Decimal>> {
    let entries = financing::Entity::find().all(db).await?;
    Ok(entries.into_iter().map(|f| (f.name, f.value)).collect())
}

/// Applies drift corrections in a single transaction. All-or-nothing: a
/// failed write leaves every stored row untouched, and the caller still
/// has the computed result to return.
#[instrument(skip(db, corrections), fields(count = corrections.len()))]
pub async fn reconcile(db: &DatabaseConnection, corrections: &[MonthCorrection]) -> Result<()> {
    if corrections.is_empty() {
        return Ok(());
    }

    let txn = db.begin().await?;
    for c in corrections {
        debug!(month_id = c.month_id, "reconciling drifted month row");
        let update = month::ActiveModel {
            id: Set(c.month_id),
            starting_funds: Set(c.starting_funds),
            ending_funds: Set(c.ending_funds),
            surplus: Set(c.surplus),
            loan_remaining: Set(c.loan_remaining),
            ..Default::default()
        };
        update.update(&txn).await?;
    }
    txn.commit().await?;
    Ok(())
}

/// Marks `is_current` on exactly the row matching the anchor month and
/// returns the index of that row, scanning in date order. `None` when the
/// anchor lies past the last month.
pub fn mark_current(rows: &mut [MonthRow], anchor: chrono::NaiveDate) -> Option<usize> {
    use chrono::Datelike;

    let anchor_ym = (anchor.year(), anchor.month());
    let idx = rows
        .iter()
        .position(|r| (r.month_date.year(), r.month_date.month()) >= anchor_ym)?;
    let chosen_ym = (rows[idx].month_date.year(), rows[idx].month_date.month());
    for row in rows.iter_mut() {
        row.is_current = (row.month_date.year(), row.month_date.month()) == chosen_ym;
    }
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn month_model(id: i32, year: i32, month_no: u32, starting: Decimal, loan: Decimal) -> month::Model {
        month::Model {
            id,
            month_date: NaiveDate::from_ymd_opt(year, month_no, 1).unwrap(),
            starting_funds: starting,
            ending_funds: Decimal::ZERO,
            surplus: Decimal::ZERO,
            loan_remaining: loan,
            is_current: false,
        }
    }

    fn income_row(month_id: i32, person: &str, amount: Decimal) -> income::Model {
        income::Model {
            id: 0,
            month_id,
            source: Some("Salary".to_string()),
            person: Some(person.to_string()),
            amount,
        }
    }

    fn expense_row(month_id: i32, amount: Decimal) -> expense::Model {
        expense::Model {
            id: 0,
            month_id,
            name: Some("Utgift".to_string()),
            category: None,
            amount,
        }
    }

    fn adjustment(month_id: i32, kind: AdjustmentKind, amount: Decimal) -> loan_adjustment::Model {
        loan_adjustment::Model {
            id: 0,
            month_id,
            name: None,
            kind,
            amount,
            note: None,
        }
    }

    fn three_months() -> Vec<MonthWithItems> {
        (0..3)
            .map(|i| MonthWithItems {
                month: month_model(
                    i + 1,
                    2026,
                    (i + 1) as u32,
                    if i == 0 { dec!(10_000) } else { Decimal::ZERO },
                    Decimal::ZERO,
                ),
                incomes: vec![income_row(i + 1, "Alex", dec!(30_000))],
                expenses: vec![expense_row(i + 1, dec!(18_000))],
                loan_adjustments: vec![],
            })
            .collect()
    }

    #[test]
    fn ending_funds_chain_into_the_next_month() {
        let months = three_months();
        let result = compute_ledger(&months, &HashMap::new());

        assert_eq!(result.rows.len(), 3);
        for row in &result.rows {
            assert_eq!(row.surplus, dec!(12_000));
        }
        assert_eq!(result.rows[0].starting_funds, dec!(10_000));
        assert_eq!(result.rows[0].ending_funds, dec!(22_000));
        assert_eq!(result.rows[1].starting_funds, result.rows[0].ending_funds);
        assert_eq!(result.rows[2].starting_funds, result.rows[1].ending_funds);
        assert_eq!(result.rows[2].ending_funds, dec!(46_000));
    }

    #[test]
    fn loan_adjustments_are_signed() {
        let mut months = three_months();
        months[0].month.loan_remaining = dec!(1_000);
        months[0].loan_adjustments = vec![
            adjustment(1, AdjustmentKind::Disbursement, dec!(500)),
            adjustment(1, AdjustmentKind::Payment, dec!(200)),
            adjustment(1, AdjustmentKind::Other, dec!(9_999)),
        ];

        let result = compute_ledger(&months, &HashMap::new());
        assert_eq!(result.rows[0].loan_remaining, dec!(1_300));
        // The balance carries forward unchanged without adjustments.
        assert_eq!(result.rows[1].loan_remaining, dec!(1_300));
        assert_eq!(result.rows[2].loan_remaining, dec!(1_300));
    }

    #[test]
    fn financing_entry_seeds_the_first_month() {
        let mut months = three_months();
        months[0].month.loan_remaining = dec!(123);
        months[1].loan_adjustments = vec![adjustment(2, AdjustmentKind::Payment, dec!(50_000))];

        let financing_map =
            HashMap::from([(LOANS_TAKEN.to_string(), dec!(2_000_000))]);
        let result = compute_ledger(&months, &financing_map);

        assert_eq!(result.rows[0].loan_remaining, dec!(2_000_000));
        assert_eq!(result.rows[1].loan_remaining, dec!(1_950_000));
    }

    #[test]
    fn stored_loan_balance_is_the_fallback_seed() {
        let mut months = three_months();
        months[0].month.loan_remaining = dec!(500_000);

        let result = compute_ledger(&months, &HashMap::new());
        assert_eq!(result.rows[0].loan_remaining, dec!(500_000));
    }

    #[test]
    fn drifted_rows_produce_corrections() {
        let months = three_months();
        let result = compute_ledger(&months, &HashMap::new());

        // The fixture stores zero ending funds everywhere, so every month
        // drifts on the first pass.
        assert_eq!(result.corrections.len(), 3);
        assert_eq!(result.corrections[0].ending_funds, dec!(22_000));

        // A second pass over corrected storage is clean.
        let mut corrected = months;
        for (entry, c) in corrected.iter_mut().zip(&result.corrections) {
            entry.month.starting_funds = c.starting_funds;
            entry.month.ending_funds = c.ending_funds;
            entry.month.surplus = c.surplus;
            entry.month.loan_remaining = c.loan_remaining;
        }
        let second = compute_ledger(&corrected, &HashMap::new());
        assert!(second.corrections.is_empty());
        assert_eq!(second.rows, result.rows);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let months = three_months();
        let first = compute_ledger(&months, &HashMap::new());
        let second = compute_ledger(&months, &HashMap::new());
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.corrections, second.corrections);
    }

    #[test]
    fn incomes_group_by_person_with_unknown_bucket() {
        let mut months = three_months();
        months[0].incomes = vec![
            income_row(1, "Alex", dec!(25_000)),
            income_row(1, "Kim", dec!(20_000)),
            income::Model {
                id: 0,
                month_id: 1,
                source: Some("Barnbidrag".to_string()),
                person: None,
                amount: dec!(1_250),
            },
        ];

        let result = compute_ledger(&months, &HashMap::new());
        let by_person = &result.rows[0].incomes_by_person;
        assert_eq!(by_person["Alex"], dec!(25_000));
        assert_eq!(by_person["Kim"], dec!(20_000));
        assert_eq!(by_person["Unknown"], dec!(1_250));
    }

    #[test]
    fn month_labels_use_the_date() {
        let months = three_months();
        let result = compute_ledger(&months, &HashMap::new());
        assert_eq!(result.rows[0].name, "January 2026");
        assert_eq!(result.rows[2].name, "March 2026");
    }

    #[test]
    fn mark_current_picks_the_anchor_month() {
        let months = three_months();
        let mut rows = compute_ledger(&months, &HashMap::new()).rows;

        let idx = mark_current(&mut rows, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
        assert_eq!(idx, Some(1));
        assert!(!rows[0].is_current);
        assert!(rows[1].is_current);
        assert!(!rows[2].is_current);

        // Anchor before the first month lands on the first month.
        let idx = mark_current(&mut rows, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(idx, Some(0));

        // Anchor past the last month matches nothing.
        let idx = mark_current(&mut rows, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(idx, None);
    }
}
