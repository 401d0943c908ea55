use crate::schemas::{ApiResponse, AppState, CachedData};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use common::{CarReport, PriceSnapshot};
use compute::tco::compute_derived;
use model::entities::car::{self, VehicleType};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Cache key for the derived car report list.
pub const CARS_CACHE_KEY: &str = "cars_list";

/// Request body for creating a new car
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCarRequest {
    /// Model name, e.g. "Volvo XC40 Recharge"
    pub model: String,
    /// Model year
    pub year: i32,
    /// One of "EV", "PHEV", "Diesel", "Bensin"
    pub vehicle_type: String,
    /// Electric consumption in kWh/100km (EV and PHEV)
    pub consumption_kwh_per_100km: Option<f64>,
    /// Fuel consumption in L/100km (Diesel, Bensin and PHEV)
    pub consumption_l_per_100km: Option<f64>,
    /// Battery capacity in kWh (PHEV electric range estimation)
    pub battery_capacity_kwh: Option<f64>,
    /// Today's asking price in SEK
    pub estimated_purchase_price: f64,
    /// Price of a summer tire set in SEK
    pub summer_tires_price: Option<f64>,
    /// Price of a winter tire set in SEK
    pub winter_tires_price: Option<f64>,
    /// Per-car override of the global tire lifespan in years
    pub tire_replacement_interval_years: Option<i32>,
    /// Known yearly full insurance cost in SEK
    pub full_insurance_year: Option<f64>,
    /// Known yearly half insurance cost in SEK
    pub half_insurance_year: Option<f64>,
    /// Known yearly vehicle tax in SEK
    pub car_tax_year: Option<f64>,
    /// Known yearly repair budget in SEK
    pub repairs_year: Option<f64>,
    /// Explicit expected resale value after 3 years
    pub expected_value_after_3y: Option<f64>,
    /// Explicit expected resale value after 5 years
    pub expected_value_after_5y: Option<f64>,
    /// Explicit expected resale value after 8 years
    pub expected_value_after_8y: Option<f64>,
}

/// Request body for updating a car; absent fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCarRequest {
    pub model: Option<String>,
    pub year: Option<i32>,
    /// One of "EV", "PHEV", "Diesel", "Bensin"
    pub vehicle_type: Option<String>,
    pub consumption_kwh_per_100km: Option<f64>,
    pub consumption_l_per_100km: Option<f64>,
    pub battery_capacity_kwh: Option<f64>,
    pub estimated_purchase_price: Option<f64>,
    pub summer_tires_price: Option<f64>,
    pub winter_tires_price: Option<f64>,
    pub tire_replacement_interval_years: Option<i32>,
    pub full_insurance_year: Option<f64>,
    pub half_insurance_year: Option<f64>,
    pub car_tax_year: Option<f64>,
    pub repairs_year: Option<f64>,
    pub expected_value_after_3y: Option<f64>,
    pub expected_value_after_5y: Option<f64>,
    pub expected_value_after_8y: Option<f64>,
}

fn parse_vehicle_type(s: &str) -> Option<VehicleType> {
    match s {
        "EV" => Some(VehicleType::Ev),
        "PHEV" => Some(VehicleType::Phev),
        "Diesel" => Some(VehicleType::Diesel),
        "Bensin" => Some(VehicleType::Bensin),
        _ => None,
    }
}

fn vehicle_type_label(vt: VehicleType) -> &'static str {
    match vt {
        VehicleType::Ev => "EV",
        VehicleType::Phev => "PHEV",
        VehicleType::Diesel => "Diesel",
        VehicleType::Bensin => "Bensin",
    }
}

/// Builds the full report for one car against the current price snapshot.
fn build_report(car: car::Model, prices: &PriceSnapshot) -> CarReport {
    let today = Utc::now().date_naive();
    let residual_model = compute::default_residual_model(Some(today));
    let derived = compute_derived(&car, prices, &residual_model, today);

    CarReport {
        id: car.id,
        model: car.model,
        year: car.year,
        vehicle_type: vehicle_type_label(car.vehicle_type).to_string(),
        consumption_kwh_per_100km: car.consumption_kwh_per_100km,
        consumption_l_per_100km: car.consumption_l_per_100km,
        battery_capacity_kwh: car.battery_capacity_kwh,
        estimated_purchase_price: car.estimated_purchase_price,
        summer_tires_price: car.summer_tires_price,
        winter_tires_price: car.winter_tires_price,
        tire_replacement_interval_years: car.tire_replacement_interval_years,
        full_insurance_year: car.full_insurance_year,
        half_insurance_year: car.half_insurance_year,
        car_tax_year: car.car_tax_year,
        repairs_year: car.repairs_year,
        derived,
    }
}

/// Persists the derived TCO totals back onto the car row. The mirrors are
/// a cache for external consumers; reads never trust them.
async fn persist_tco_mirrors(
    state: &AppState,
    car_model: car::Model,
    prices: &PriceSnapshot,
) -> Result<CarReport, sea_orm::DbErr> {
    let report = build_report(car_model.clone(), prices);

    let mut active: car::ActiveModel = car_model.into();
    active.tco_3_years = Set(Some(report.derived.tco_total_3y));
    active.tco_5_years = Set(Some(report.derived.tco_total_5y));
    active.tco_8_years = Set(Some(report.derived.tco_total_8y));
    active.update(&state.db).await?;

    Ok(report)
}

/// Get all cars with derived cost reports
#[utoipa::path(
    get,
    path = "/api/cars",
    tag = "cars",
    responses(
        (status = 200, description = "Cars retrieved successfully", body = ApiResponse<Vec<CarReport>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_cars(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CarReport>>>, StatusCode> {
    trace!("Entering get_cars function");

    if let Some(CachedData::Cars(reports)) = state.cache.get(CARS_CACHE_KEY).await {
        debug!("Returning {} car reports from cache", reports.len());
        return Ok(Json(ApiResponse {
            data: reports,
            message: "Cars retrieved successfully".to_string(),
            success: true,
        }));
    }

    let prices = match compute::prices::fetch(&state.db).await {
        Ok(prices) => prices,
        Err(e) => {
            error!("Failed to load price settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match car::Entity::find().all(&state.db).await {
        Ok(cars) => {
            let reports: Vec<CarReport> = cars
                .into_iter()
                .map(|c| build_report(c, &prices))
                .collect();
            info!("Computed derived reports for {} cars", reports.len());

            state
                .cache
                .insert(CARS_CACHE_KEY.to_string(), CachedData::Cars(reports.clone()))
                .await;

            Ok(Json(ApiResponse {
                data: reports,
                message: "Cars retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve cars from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a new car
#[utoipa::path(
    post,
    path = "/api/cars",
    tag = "cars",
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car created successfully", body = ApiResponse<CarReport>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarReport>>), StatusCode> {
    trace!("Entering create_car function");
    debug!("Creating car: {} ({})", request.model, request.vehicle_type);

    let Some(vehicle_type) = parse_vehicle_type(&request.vehicle_type) else {
        warn!("Rejected unknown vehicle type: {}", request.vehicle_type);
        return Err(StatusCode::BAD_REQUEST);
    };

    let new_car = car::ActiveModel {
        model: Set(request.model.clone()),
        year: Set(request.year),
        vehicle_type: Set(vehicle_type),
        consumption_kwh_per_100km: Set(request.consumption_kwh_per_100km),
        consumption_l_per_100km: Set(request.consumption_l_per_100km),
        battery_capacity_kwh: Set(request.battery_capacity_kwh),
        estimated_purchase_price: Set(request.estimated_purchase_price),
        summer_tires_price: Set(request.summer_tires_price.unwrap_or(0.0)),
        winter_tires_price: Set(request.winter_tires_price.unwrap_or(0.0)),
        tire_replacement_interval_years: Set(request.tire_replacement_interval_years),
        full_insurance_year: Set(request.full_insurance_year),
        half_insurance_year: Set(request.half_insurance_year),
        car_tax_year: Set(request.car_tax_year),
        repairs_year: Set(request.repairs_year),
        expected_value_after_3y: Set(request.expected_value_after_3y),
        expected_value_after_5y: Set(request.expected_value_after_5y),
        expected_value_after_8y: Set(request.expected_value_after_8y),
        ..Default::default()
    };

    let inserted = match new_car.insert(&state.db).await {
        Ok(model) => model,
        Err(db_error) => {
            error!("Failed to create car '{}': {}", request.model, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let prices = match compute::prices::fetch(&state.db).await {
        Ok(prices) => prices,
        Err(e) => {
            error!("Failed to load price settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match persist_tco_mirrors(&state, inserted, &prices).await {
        Ok(report) => {
            info!("Car created successfully with ID: {}, model: {}", report.id, report.model);
            state.cache.invalidate(CARS_CACHE_KEY).await;
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: report,
                    message: "Car created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to persist TCO mirrors for new car: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a car
#[utoipa::path(
    put,
    path = "/api/cars/{car_id}",
    tag = "cars",
    params(
        ("car_id" = i32, Path, description = "Car ID"),
    ),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Car updated successfully", body = ApiResponse<CarReport>),
        (status = 404, description = "Car not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_car(
    Path(car_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<CarReport>>, StatusCode> {
    trace!("Entering update_car function for car_id: {}", car_id);

    let existing = match car::Entity::find_by_id(car_id).one(&state.db).await {
        Ok(Some(car)) => car,
        Ok(None) => {
            warn!("Car with ID {} not found for update", car_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup car with ID {} for update: {}", car_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: car::ActiveModel = existing.into();

    if let Some(model) = request.model {
        active.model = Set(model);
    }
    if let Some(year) = request.year {
        active.year = Set(year);
    }
    if let Some(vehicle_type) = request.vehicle_type {
        let Some(parsed) = parse_vehicle_type(&vehicle_type) else {
            warn!("Rejected unknown vehicle type: {}", vehicle_type);
            return Err(StatusCode::BAD_REQUEST);
        };
        active.vehicle_type = Set(parsed);
    }
    if let Some(v) = request.consumption_kwh_per_100km {
        active.consumption_kwh_per_100km = Set(Some(v));
    }
    if let Some(v) = request.consumption_l_per_100km {
        active.consumption_l_per_100km = Set(Some(v));
    }
    if let Some(v) = request.battery_capacity_kwh {
        active.battery_capacity_kwh = Set(Some(v));
    }
    if let Some(v) = request.estimated_purchase_price {
        active.estimated_purchase_price = Set(v);
    }
    if let Some(v) = request.summer_tires_price {
        active.summer_tires_price = Set(v);
    }
    if let Some(v) = request.winter_tires_price {
        active.winter_tires_price = Set(v);
    }
    if let Some(v) = request.tire_replacement_interval_years {
        active.tire_replacement_interval_years = Set(Some(v));
    }
    if let Some(v) = request.full_insurance_year {
        active.full_insurance_year = Set(Some(v));
    }
    if let Some(v) = request.half_insurance_year {
        active.half_insurance_year = Set(Some(v));
    }
    if let Some(v) = request.car_tax_year {
        active.car_tax_year = Set(Some(v));
    }
    if let Some(v) = request.repairs_year {
        active.repairs_year = Set(Some(v));
    }
    if let Some(v) = request.expected_value_after_3y {
        active.expected_value_after_3y = Set(Some(v));
    }
    if let Some(v) = request.expected_value_after_5y {
        active.expected_value_after_5y = Set(Some(v));
    }
    if let Some(v) = request.expected_value_after_8y {
        active.expected_value_after_8y = Set(Some(v));
    }

    let updated = match active.update(&state.db).await {
        Ok(model) => model,
        Err(db_error) => {
            error!("Failed to update car with ID {}: {}", car_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let prices = match compute::prices::fetch(&state.db).await {
        Ok(prices) => prices,
        Err(e) => {
            error!("Failed to load price settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match persist_tco_mirrors(&state, updated, &prices).await {
        Ok(report) => {
            info!("Car with ID {} updated successfully", car_id);
            state.cache.invalidate(CARS_CACHE_KEY).await;
            Ok(Json(ApiResponse {
                data: report,
                message: "Car updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to persist TCO mirrors for car {}: {}", car_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a car
#[utoipa::path(
    delete,
    path = "/api/cars/{car_id}",
    tag = "cars",
    params(
        ("car_id" = i32, Path, description = "Car ID"),
    ),
    responses(
        (status = 200, description = "Car deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Car not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_car(
    Path(car_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_car function for car_id: {}", car_id);

    match car::Entity::delete_by_id(car_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Car with ID {} deleted successfully", car_id);
                state.cache.invalidate(CARS_CACHE_KEY).await;
                Ok(Json(ApiResponse {
                    data: format!("Car {} deleted", car_id),
                    message: "Car deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Car with ID {} not found for deletion", car_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete car with ID {}: {}", car_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
