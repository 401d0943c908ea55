//! Common transport-layer types shared between the compute crate and the
//! HTTP backend. These structs are the JSON shapes the API returns, so the
//! handlers and the calculators agree on payloads without duplication.

mod derived;
mod ledger;

pub use derived::{CarReport, DerivedCosts, PriceSnapshot};
pub use ledger::{ExpenseRow, IncomeRow, LoanAdjustmentRow, MonthRow};
