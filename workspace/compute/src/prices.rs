//! Normalization of the stored price-settings row into a [`PriceSnapshot`]
//! the calculators can use directly. Absent or non-positive values fall
//! back to the documented defaults, so the calculators never see a hole.

use common::PriceSnapshot;
use model::entities::price_settings;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::instrument;

use crate::error::Result;

/// Id of the single logical settings row.
pub const SETTINGS_ROW_ID: i32 = 1;

fn pos_f64(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(x) if x > 0.0 => x,
        _ => fallback,
    }
}

fn pos_i32(v: Option<i32>, fallback: i32) -> i32 {
    match v {
        Some(x) if x > 0 => x,
        _ => fallback,
    }
}

/// Converts a settings row into a normalized snapshot. Safe if the row is
/// missing entirely. The electricity price is converted öre → SEK and the
/// charging loss is folded in.
pub fn normalize(ps: Option<&price_settings::Model>) -> PriceSnapshot {
    let defaults = PriceSnapshot::default();
    let Some(ps) = ps else {
        return defaults;
    };

    let ore = pos_i32(ps.el_price_ore_kwh, 250) as f64;
    let loss = pos_f64(ps.charging_loss_pct, defaults.charging_loss_pct);

    PriceSnapshot {
        elec_sek_kwh: (ore / 100.0) * (1.0 + loss),
        diesel_sek_litre: pos_f64(ps.diesel_price_sek_litre, defaults.diesel_sek_litre),
        bensin_sek_litre: pos_f64(ps.bensin_price_sek_litre, defaults.bensin_sek_litre),
        yearly_km: pos_i32(ps.yearly_km, defaults.yearly_km),
        daily_commute_km: pos_i32(ps.daily_commute_km, defaults.daily_commute_km),
        charging_loss_pct: loss,
        tire_lifespan_years: pos_i32(ps.tire_lifespan_years, defaults.tire_lifespan_years).max(1),
        downpayment_sek: ps.downpayment_sek.unwrap_or(defaults.downpayment_sek).max(0.0),
        interest_rate_pct: ps
            .interest_rate_pct
            .unwrap_or(defaults.interest_rate_pct)
            .max(0.0),
    }
}

/// Loads the settings row and returns the normalized snapshot, defaults if
/// the row does not exist.
#[instrument(skip(db))]
pub async fn fetch(db: &DatabaseConnection) -> Result<PriceSnapshot> {
    let row = price_settings::Entity::find_by_id(SETTINGS_ROW_ID).one(db).await?;
    Ok(normalize(row.as_ref()))
}
