use sea_orm::entity::prelude::*;

/// Drivetrain classification of a car. Determines which consumption
/// column is authoritative: kWh/100km for EV, L/100km for Diesel and
/// Bensin, both blended for PHEV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum VehicleType {
    #[sea_orm(string_value = "EV")]
    Ev,
    #[sea_orm(string_value = "PHEV")]
    Phev,
    #[sea_orm(string_value = "Diesel")]
    Diesel,
    #[sea_orm(string_value = "Bensin")]
    Bensin,
}

/// A car under evaluation, with the asking price and whatever yearly
/// cost figures are known. Missing figures are estimated by the
/// compute layer, never treated as errors.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub model: String,
    /// Model year; registration is assumed mid-year (July 1).
    pub year: i32,
    pub vehicle_type: VehicleType,
    // Explicit column names: the default casing round-trip drops the
    // underscore before a digit.
    #[sea_orm(column_name = "consumption_kwh_per_100km")]
    pub consumption_kwh_per_100km: Option<f64>,
    #[sea_orm(column_name = "consumption_l_per_100km")]
    pub consumption_l_per_100km: Option<f64>,
    pub battery_capacity_kwh: Option<f64>,
    /// Today's asking price in SEK.
    pub estimated_purchase_price: f64,
    pub summer_tires_price: f64,
    pub winter_tires_price: f64,
    /// Per-car override of the global tire lifespan setting.
    pub tire_replacement_interval_years: Option<i32>,
    pub full_insurance_year: Option<f64>,
    pub half_insurance_year: Option<f64>,
    pub car_tax_year: Option<f64>,
    pub repairs_year: Option<f64>,
    /// Explicit expected resale values; when present they override the
    /// residual model entirely.
    #[sea_orm(column_name = "expected_value_after_3y")]
    pub expected_value_after_3y: Option<f64>,
    #[sea_orm(column_name = "expected_value_after_5y")]
    pub expected_value_after_5y: Option<f64>,
    #[sea_orm(column_name = "expected_value_after_8y")]
    pub expected_value_after_8y: Option<f64>,
    /// Persisted mirrors of the derived TCO totals. Cache only; the
    /// derived report is recomputed on every read.
    #[sea_orm(column_name = "tco_3_years")]
    pub tco_3_years: Option<f64>,
    #[sea_orm(column_name = "tco_5_years")]
    pub tco_5_years: Option<f64>,
    #[sea_orm(column_name = "tco_8_years")]
    pub tco_8_years: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
