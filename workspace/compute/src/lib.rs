pub mod depreciation;
pub mod energy;
pub mod error;
pub mod financing;
pub mod ledger;
pub mod prices;
pub mod tco;

use chrono::{NaiveDate, Utc};

use depreciation::ResidualModel;

/// Returns the residual model the API endpoints use by default.
///
/// The curve-based model is the canonical choice; it is evaluated relative
/// to the provided date, or the current date if none is given. The flat
/// model remains available for callers that want the cruder estimate.
pub fn default_residual_model(today: Option<NaiveDate>) -> ResidualModel {
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    ResidualModel::CurveBased { today }
}
