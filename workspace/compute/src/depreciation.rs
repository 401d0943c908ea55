//! Depreciation model: retained value vs the NEW price as a function of
//! age in months, per drivetrain class. Anchors at 36/60/96 months are
//! EU/SE market heuristics; between anchors we interpolate linearly, past
//! the last anchor a gentle tail decay applies down to the salvage floor.

use chrono::{Datelike, NaiveDate};
use common::PriceSnapshot;
use model::entities::car::{self, VehicleType};

/// Minimum retained value vs the NEW price.
pub const SALVAGE_FLOOR: f64 = 0.15;
/// Standard mileage assumption baked into the retention anchors.
pub const STD_KM_PER_YEAR: i32 = 20_000;
/// -1 pp of value per +10k km/year over the standard mileage.
const MILEAGE_SLOPE_PER_10K: f64 = 0.01;
/// Typical battery warranty horizon.
const WARRANTY_MONTHS: u32 = 96;
/// Extra drop applied to BEV/PHEV values when crossing the warranty horizon.
const WARRANTY_KINK_PP: f64 = 0.03;
/// Additional pp decay per year of age beyond the last anchor.
const TAIL_DECAY_PP_PER_YEAR: f64 = 0.015;

/// Drivetrain classes the retention grids are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionClass {
    Petrol,
    Diesel,
    Hev,
    Phev,
    Bev,
}

impl RetentionClass {
    pub fn from_vehicle_type(vehicle_type: VehicleType) -> Self {
        match vehicle_type {
            VehicleType::Ev => RetentionClass::Bev,
            VehicleType::Phev => RetentionClass::Phev,
            VehicleType::Diesel => RetentionClass::Diesel,
            VehicleType::Bensin => RetentionClass::Petrol,
        }
    }

    /// Retention anchors as (months, retained fraction of NEW price).
    fn anchors(self) -> [(f64, f64); 3] {
        match self {
            RetentionClass::Petrol => [(36.0, 0.53), (60.0, 0.40), (96.0, 0.28)],
            RetentionClass::Diesel => [(36.0, 0.50), (60.0, 0.38), (96.0, 0.25)],
            RetentionClass::Hev => [(36.0, 0.56), (60.0, 0.42), (96.0, 0.30)],
            RetentionClass::Phev => [(36.0, 0.49), (60.0, 0.36), (96.0, 0.26)],
            RetentionClass::Bev => [(36.0, 0.42), (60.0, 0.32), (96.0, 0.24)],
        }
    }
}

/// Retention vs NEW price at the given age in months.
///
/// A baseline point of (0 months, 1.0) is implicit, so fresh cars start at
/// full value and drop toward the first anchor. The result never goes
/// below [`SALVAGE_FLOOR`].
pub fn retention_at(class: RetentionClass, months: u32) -> f64 {
    let m = f64::from(months);
    let mut prev = (0.0, 1.0);

    for (anchor_m, anchor_r) in class.anchors() {
        if m <= anchor_m {
            let t = if anchor_m > prev.0 {
                (m - prev.0) / (anchor_m - prev.0)
            } else {
                0.0
            };
            return (prev.1 + t * (anchor_r - prev.1)).max(SALVAGE_FLOOR);
        }
        prev = (anchor_m, anchor_r);
    }

    // Beyond the last anchor: tail decay toward the floor.
    let extra_years = (m - prev.0) / 12.0;
    (prev.1 - TAIL_DECAY_PP_PER_YEAR * extra_years).max(SALVAGE_FLOOR)
}

/// Age in months since registration, assuming mid-year (July 1)
/// registration for the model year. Never negative.
pub fn months_since_registration(model_year: i32, today: NaiveDate) -> u32 {
    if model_year <= 0 {
        return 0;
    }
    let months =
        i64::from(today.year() - model_year) * 12 + (i64::from(today.month()) - 7);
    months.max(0) as u32
}

/// Reverse-engineers the as-new price from today's asking price.
/// Diagnostic only; the TCO totals never consume this.
pub fn estimate_new_price_from_today_price(
    today_price: f64,
    model_year: i32,
    class: RetentionClass,
    today: NaiveDate,
) -> f64 {
    let r_now = retention_at(class, months_since_registration(model_year, today));
    if r_now <= 0.0 {
        today_price
    } else {
        today_price / r_now
    }
}

/// Expected market value `years_ahead` years from now, given today's
/// asking price.
///
/// The core is the ratio of retention at the future age to retention at
/// the current age. Two adjustments apply on top:
/// - BEV/PHEV crossing the warranty horizon between now and then take an
///   extra [`WARRANTY_KINK_PP`] hit, floored at the salvage floor.
/// - Driving more than the standard mileage shaves 1 pp per extra
///   10 000 km/year accumulated over the horizon.
pub fn predict_future_value(
    today_price: f64,
    model_year: i32,
    years_ahead: u32,
    class: RetentionClass,
    future_yearly_km: i32,
    today: NaiveDate,
) -> f64 {
    let now_m = months_since_registration(model_year, today);
    let future_m = now_m + years_ahead * 12;

    let r_now = retention_at(class, now_m);
    let mut r_future = retention_at(class, future_m);

    let crosses_warranty = now_m < WARRANTY_MONTHS && WARRANTY_MONTHS <= future_m;
    if crosses_warranty && matches!(class, RetentionClass::Bev | RetentionClass::Phev) {
        r_future = (r_future - WARRANTY_KINK_PP).max(SALVAGE_FLOOR);
    }

    let ratio = if r_now > 0.0 { r_future / r_now } else { 0.0 };
    let mut expected = today_price * ratio;

    let extra_km_per_year = f64::from((future_yearly_km - STD_KM_PER_YEAR).max(0));
    let delta_10k = extra_km_per_year * f64::from(years_ahead) / 10_000.0;
    if delta_10k > 0.0 {
        expected *= (1.0 - MILEAGE_SLOPE_PER_10K * delta_10k).max(0.0);
    }
    expected
}

/// Expected resale values at the three TCO horizons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residuals {
    pub at_3y: f64,
    pub at_5y: f64,
    pub at_8y: f64,
}

/// Strategy for estimating resale values. Both models coexist; the API
/// default is the curve-based one. Explicit per-car expected values
/// override whichever model is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResidualModel {
    /// Flat retained-value percentages (55/40/25% at 3/5/8 years),
    /// independent of drivetrain and age.
    FlatRate,
    /// Age-based retention curve with warranty and mileage adjustments,
    /// evaluated relative to `today`.
    CurveBased { today: NaiveDate },
}

impl ResidualModel {
    pub fn residuals(&self, car: &car::Model, prices: &PriceSnapshot) -> Residuals {
        let purchase = car.estimated_purchase_price;
        let computed = match *self {
            ResidualModel::FlatRate => Residuals {
                at_3y: purchase * 0.55,
                at_5y: purchase * 0.40,
                at_8y: purchase * 0.25,
            },
            ResidualModel::CurveBased { today } => {
                let class = RetentionClass::from_vehicle_type(car.vehicle_type);
                let predict = |years| {
                    predict_future_value(
                        purchase,
                        car.year,
                        years,
                        class,
                        prices.yearly_km,
                        today,
                    )
                };
                Residuals {
                    at_3y: predict(3),
                    at_5y: predict(5),
                    at_8y: predict(8),
                }
            }
        };
        Residuals {
            at_3y: car.expected_value_after_3y.unwrap_or(computed.at_3y),
            at_5y: car.expected_value_after_5y.unwrap_or(computed.at_5y),
            at_8y: car.expected_value_after_8y.unwrap_or(computed.at_8y),
        }
    }
}
