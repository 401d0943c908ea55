use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized economic parameters, resolved from the stored settings row
/// with documented defaults substituted for absent values. The electricity
/// price is already converted to SEK/kWh and includes charging losses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceSnapshot {
    /// Electricity price in SEK per kWh, charging losses included.
    pub elec_sek_kwh: f64,
    pub diesel_sek_litre: f64,
    pub bensin_sek_litre: f64,
    pub yearly_km: i32,
    pub daily_commute_km: i32,
    /// Charger/system loss fraction already folded into `elec_sek_kwh`.
    pub charging_loss_pct: f64,
    /// Years a tire set lasts; always at least 1.
    pub tire_lifespan_years: i32,
    pub downpayment_sek: f64,
    /// Nominal APR in percent for car financing.
    pub interest_rate_pct: f64,
}

impl Default for PriceSnapshot {
    fn default() -> Self {
        Self {
            // 250 öre/kWh with 10% charging loss
            elec_sek_kwh: 2.50 * 1.10,
            diesel_sek_litre: 15.0,
            bensin_sek_litre: 14.0,
            yearly_km: 18_000,
            daily_commute_km: 30,
            charging_loss_pct: 0.10,
            tire_lifespan_years: 3,
            downpayment_sek: 0.0,
            interest_rate_pct: 5.0,
        }
    }
}

/// Per-car derived cost report, recomputed on every read. All monetary
/// figures are SEK rounded to 2 decimals. The `*_effective` fields show the
/// yearly figures actually used in the totals, estimator fallbacks applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DerivedCosts {
    pub energy_cost_year: f64,
    pub energy_cost_month: f64,
    pub tires_year_effective: f64,
    pub full_insurance_year_effective: f64,
    pub car_tax_year_effective: f64,
    pub repairs_year_effective: f64,
    /// Sum of energy, insurance, tax, repairs and tires per year.
    pub recurring_cost_year: f64,
    /// Diagnostic: as-new price reverse-engineered from today's price.
    /// Informational only; never folded into the TCO totals.
    pub new_price_estimate: f64,
    /// Diagnostic companion to `new_price_estimate`, in percent.
    pub depreciation_since_new_pct: f64,
    pub expected_value_after_3y: f64,
    pub expected_value_after_5y: f64,
    pub expected_value_after_8y: f64,
    /// Interest paid over the financed part at each horizon.
    pub interest_3y: f64,
    pub interest_5y: f64,
    pub interest_8y: f64,
    pub tco_total_3y: f64,
    pub tco_total_5y: f64,
    pub tco_total_8y: f64,
    pub tco_per_month_3y: f64,
    pub tco_per_month_5y: f64,
    pub tco_per_month_8y: f64,
}

/// A car's raw stored fields together with its freshly derived costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CarReport {
    pub id: i32,
    pub model: String,
    pub year: i32,
    /// One of "EV", "PHEV", "Diesel", "Bensin".
    pub vehicle_type: String,
    pub consumption_kwh_per_100km: Option<f64>,
    pub consumption_l_per_100km: Option<f64>,
    pub battery_capacity_kwh: Option<f64>,
    pub estimated_purchase_price: f64,
    pub summer_tires_price: f64,
    pub winter_tires_price: f64,
    pub tire_replacement_interval_years: Option<i32>,
    pub full_insurance_year: Option<f64>,
    pub half_insurance_year: Option<f64>,
    pub car_tax_year: Option<f64>,
    pub repairs_year: Option<f64>,
    #[serde(flatten)]
    pub derived: DerivedCosts,
}
