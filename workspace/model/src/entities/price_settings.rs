use sea_orm::entity::prelude::*;

/// Global economic parameters used by the cost calculators.
/// A single logical row (id = 1); every column is nullable and the
/// compute layer substitutes documented defaults for absent values.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Electricity price in öre per kWh (250 öre = 2.50 SEK).
    pub el_price_ore_kwh: Option<i32>,
    pub diesel_price_sek_litre: Option<f64>,
    pub bensin_price_sek_litre: Option<f64>,
    /// Total distance driven per year.
    pub yearly_km: Option<i32>,
    /// One-way-and-back commute distance per working day.
    pub daily_commute_km: Option<i32>,
    /// Charger/system losses applied on top of the electricity price,
    /// as a fraction (0.10 = 10%).
    pub charging_loss_pct: Option<f64>,
    /// Years a tire set lasts before replacement.
    pub tire_lifespan_years: Option<i32>,
    pub downpayment_sek: Option<f64>,
    /// Nominal APR in percent for car financing.
    pub interest_rate_pct: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
