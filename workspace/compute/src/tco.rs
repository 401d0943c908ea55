//! Total-cost-of-ownership aggregation: energy + fixed recurring costs +
//! depreciation + financing interest at the 3/5/8-year horizons.
//!
//! Stored yearly cost figures are preferred; where the database has
//! nothing, conservative estimators fill the gap so the report is always
//! complete. The downpayment itself is never added to the TCO; it only
//! reduces the financed principal.

use chrono::{Datelike, NaiveDate};
use common::{DerivedCosts, PriceSnapshot};
use model::entities::car::{self, VehicleType};
use tracing::instrument;

use crate::depreciation::{
    estimate_new_price_from_today_price, ResidualModel, RetentionClass,
};
use crate::energy::annual_energy_cost;
use crate::financing::amortized_totals;

/// Half insurance is assumed to cost 55% of full insurance.
const HALF_OF_FULL_INSURANCE: f64 = 0.55;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Yearly full-insurance estimate when the database has no figure:
/// base + rate * price, clamped to a plausible band.
fn estimate_full_insurance_year(price: f64, vehicle_type: VehicleType) -> f64 {
    let is_ev = vehicle_type == VehicleType::Ev;
    if price <= 0.0 {
        return if is_ev { 11_000.0 } else { 12_000.0 };
    }
    let (base, rate) = if is_ev { (4_000.0, 0.020) } else { (5_000.0, 0.022) };
    (base + rate * price).clamp(7_000.0, 15_000.0)
}

/// Yearly vehicle tax estimate; EVs get the minimum rate.
fn estimate_tax_year(vehicle_type: VehicleType) -> f64 {
    if vehicle_type == VehicleType::Ev {
        360.0
    } else {
        1_600.0
    }
}

/// Yearly repair estimate; grows once the car is out of its first years.
fn estimate_repairs_year(vehicle_type: VehicleType, model_year: i32, today: NaiveDate) -> f64 {
    let age = (today.year() - model_year).max(0);
    let base = if vehicle_type == VehicleType::Ev { 3_000.0 } else { 5_000.0 };
    base + f64::from((age - 5).max(0)) * 300.0
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x > 0.0)
}

/// Builds the full derived cost report for one car.
#[instrument(skip(car, prices, residual_model), fields(car_id = car.id))]
pub fn compute_derived(
    car: &car::Model,
    prices: &PriceSnapshot,
    residual_model: &ResidualModel,
    today: NaiveDate,
) -> DerivedCosts {
    let purchase = car.estimated_purchase_price;

    let energy_year = annual_energy_cost(car, prices);

    // Tires amortized over their lifespan; per-car interval wins over the
    // global setting.
    let tires_total = car.summer_tires_price + car.winter_tires_price;
    let tire_life = car
        .tire_replacement_interval_years
        .filter(|y| *y > 0)
        .unwrap_or(prices.tire_lifespan_years)
        .max(1);
    let tires_year = if tires_total > 0.0 {
        tires_total / f64::from(tire_life)
    } else {
        0.0
    };

    let insurance_year = match (positive(car.full_insurance_year), positive(car.half_insurance_year)) {
        (Some(full), _) => full,
        (None, Some(half)) => half / HALF_OF_FULL_INSURANCE,
        (None, None) => estimate_full_insurance_year(purchase, car.vehicle_type),
    };

    let tax_year = positive(car.car_tax_year).unwrap_or_else(|| estimate_tax_year(car.vehicle_type));

    let repairs_year = positive(car.repairs_year)
        .unwrap_or_else(|| estimate_repairs_year(car.vehicle_type, car.year, today));

    let recurring_year = energy_year + insurance_year + tax_year + repairs_year + tires_year;

    let residuals = residual_model.residuals(car, prices);
    let dep_3y = (purchase - residuals.at_3y).max(0.0);
    let dep_5y = (purchase - residuals.at_5y).max(0.0);
    let dep_8y = (purchase - residuals.at_8y).max(0.0);

    let down = prices.downpayment_sek;
    let apr = prices.interest_rate_pct;
    let interest_3y = amortized_totals(purchase, down, apr, 3).interest_paid;
    let interest_5y = amortized_totals(purchase, down, apr, 5).interest_paid;
    let interest_8y = amortized_totals(purchase, down, apr, 8).interest_paid;

    let tco_3y = dep_3y + 3.0 * recurring_year + interest_3y;
    let tco_5y = dep_5y + 5.0 * recurring_year + interest_5y;
    let tco_8y = dep_8y + 8.0 * recurring_year + interest_8y;

    // Diagnostic reverse depreciation: what the car would have cost new.
    let class = RetentionClass::from_vehicle_type(car.vehicle_type);
    let new_price = estimate_new_price_from_today_price(purchase, car.year, class, today);
    let dep_since_new_pct = if new_price > 0.0 {
        (1.0 - purchase / new_price) * 100.0
    } else {
        0.0
    };

    DerivedCosts {
        energy_cost_year: round2(energy_year),
        energy_cost_month: round2(energy_year / 12.0),
        tires_year_effective: round2(tires_year),
        full_insurance_year_effective: round2(insurance_year),
        car_tax_year_effective: round2(tax_year),
        repairs_year_effective: round2(repairs_year),
        recurring_cost_year: round2(recurring_year),
        new_price_estimate: round2(new_price),
        depreciation_since_new_pct: round2(dep_since_new_pct),
        expected_value_after_3y: round2(residuals.at_3y),
        expected_value_after_5y: round2(residuals.at_5y),
        expected_value_after_8y: round2(residuals.at_8y),
        interest_3y: round2(interest_3y),
        interest_5y: round2(interest_5y),
        interest_8y: round2(interest_8y),
        tco_total_3y: round2(tco_3y),
        tco_total_5y: round2(tco_5y),
        tco_total_8y: round2(tco_8y),
        tco_per_month_3y: round2(tco_3y / 36.0),
        tco_per_month_5y: round2(tco_5y / 60.0),
        tco_per_month_8y: round2(tco_8y / 96.0),
    }
}
