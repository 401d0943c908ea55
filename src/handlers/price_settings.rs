use crate::handlers::cars::CARS_CACHE_KEY;
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use common::PriceSnapshot;
use compute::prices::{normalize, SETTINGS_ROW_ID};
use model::entities::price_settings;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, trace};
use utoipa::ToSchema;

/// Request body for updating price settings; absent fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePriceSettingsRequest {
    /// Electricity price in öre per kWh
    pub el_price_ore_kwh: Option<i32>,
    /// Diesel price in SEK per litre
    pub diesel_price_sek_litre: Option<f64>,
    /// Petrol price in SEK per litre
    pub bensin_price_sek_litre: Option<f64>,
    /// Total distance driven per year in km
    pub yearly_km: Option<i32>,
    /// Round-trip commute distance per working day in km
    pub daily_commute_km: Option<i32>,
    /// Charging loss fraction (0.10 = 10%)
    pub charging_loss_pct: Option<f64>,
    /// Years a tire set lasts
    pub tire_lifespan_years: Option<i32>,
    /// Downpayment in SEK for car financing
    pub downpayment_sek: Option<f64>,
    /// Nominal APR in percent for car financing
    pub interest_rate_pct: Option<f64>,
}

/// Stored settings together with the effective values the calculators use
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceSettingsResponse {
    pub el_price_ore_kwh: Option<i32>,
    pub diesel_price_sek_litre: Option<f64>,
    pub bensin_price_sek_litre: Option<f64>,
    pub yearly_km: Option<i32>,
    pub daily_commute_km: Option<i32>,
    pub charging_loss_pct: Option<f64>,
    pub tire_lifespan_years: Option<i32>,
    pub downpayment_sek: Option<f64>,
    pub interest_rate_pct: Option<f64>,
    /// Normalized values with defaults substituted, as the calculators see them
    pub effective: PriceSnapshot,
}

fn to_response(row: Option<price_settings::Model>) -> PriceSettingsResponse {
    let effective = normalize(row.as_ref());
    match row {
        Some(row) => PriceSettingsResponse {
            el_price_ore_kwh: row.el_price_ore_kwh,
            diesel_price_sek_litre: row.diesel_price_sek_litre,
            bensin_price_sek_litre: row.bensin_price_sek_litre,
            yearly_km: row.yearly_km,
            daily_commute_km: row.daily_commute_km,
            charging_loss_pct: row.charging_loss_pct,
            tire_lifespan_years: row.tire_lifespan_years,
            downpayment_sek: row.downpayment_sek,
            interest_rate_pct: row.interest_rate_pct,
            effective,
        },
        None => PriceSettingsResponse {
            el_price_ore_kwh: None,
            diesel_price_sek_litre: None,
            bensin_price_sek_litre: None,
            yearly_km: None,
            daily_commute_km: None,
            charging_loss_pct: None,
            tire_lifespan_years: None,
            downpayment_sek: None,
            interest_rate_pct: None,
            effective,
        },
    }
}

/// Get the global price settings
#[utoipa::path(
    get,
    path = "/api/settings/prices",
    tag = "settings",
    responses(
        (status = 200, description = "Price settings retrieved successfully", body = ApiResponse<PriceSettingsResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_price_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PriceSettingsResponse>>, StatusCode> {
    trace!("Entering get_price_settings function");

    match price_settings::Entity::find_by_id(SETTINGS_ROW_ID).one(&state.db).await {
        Ok(row) => Ok(Json(ApiResponse {
            data: to_response(row),
            message: "Price settings retrieved successfully".to_string(),
            success: true,
        })),
        Err(db_error) => {
            error!("Failed to retrieve price settings: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update the global price settings
#[utoipa::path(
    put,
    path = "/api/settings/prices",
    tag = "settings",
    request_body = UpdatePriceSettingsRequest,
    responses(
        (status = 200, description = "Price settings updated successfully", body = ApiResponse<PriceSettingsResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_price_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdatePriceSettingsRequest>,
) -> Result<Json<ApiResponse<PriceSettingsResponse>>, StatusCode> {
    trace!("Entering update_price_settings function");

    let existing = match price_settings::Entity::find_by_id(SETTINGS_ROW_ID).one(&state.db).await {
        Ok(row) => row,
        Err(db_error) => {
            error!("Failed to lookup price settings for update: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let is_insert = existing.is_none();
    let mut active: price_settings::ActiveModel = match existing {
        Some(row) => row.into(),
        None => price_settings::ActiveModel {
            id: Set(SETTINGS_ROW_ID),
            ..Default::default()
        },
    };

    if let Some(v) = request.el_price_ore_kwh {
        active.el_price_ore_kwh = Set(Some(v));
    }
    if let Some(v) = request.diesel_price_sek_litre {
        active.diesel_price_sek_litre = Set(Some(v));
    }
    if let Some(v) = request.bensin_price_sek_litre {
        active.bensin_price_sek_litre = Set(Some(v));
    }
    if let Some(v) = request.yearly_km {
        active.yearly_km = Set(Some(v));
    }
    if let Some(v) = request.daily_commute_km {
        active.daily_commute_km = Set(Some(v));
    }
    if let Some(v) = request.charging_loss_pct {
        active.charging_loss_pct = Set(Some(v));
    }
    if let Some(v) = request.tire_lifespan_years {
        active.tire_lifespan_years = Set(Some(v));
    }
    if let Some(v) = request.downpayment_sek {
        active.downpayment_sek = Set(Some(v));
    }
    if let Some(v) = request.interest_rate_pct {
        active.interest_rate_pct = Set(Some(v));
    }

    let saved = if is_insert {
        active.insert(&state.db).await
    } else {
        active.update(&state.db).await
    };

    match saved {
        Ok(row) => {
            info!("Price settings updated");
            // Derived car reports depend on the settings.
            state.cache.invalidate(CARS_CACHE_KEY).await;
            Ok(Json(ApiResponse {
                data: to_response(Some(row)),
                message: "Price settings updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to save price settings: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
