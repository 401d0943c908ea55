use common::{CarReport, DerivedCosts, ExpenseRow, IncomeRow, LoanAdjustmentRow, MonthRow, PriceSnapshot};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Cars(Vec<CarReport>),
}

/// Query parameters for the ledger months endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct MonthsQuery {
    /// Anchor month in YYYY-MM format; defaults to the current month
    pub anchor: Option<String>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::cars::get_cars,
        crate::handlers::cars::create_car,
        crate::handlers::cars::update_car,
        crate::handlers::cars::delete_car,
        crate::handlers::months::get_months,
        crate::handlers::months::get_all_months,
        crate::handlers::price_settings::get_price_settings,
        crate::handlers::price_settings::update_price_settings,
    ),
    components(
        schemas(
            ApiResponse<Vec<CarReport>>,
            ApiResponse<CarReport>,
            ApiResponse<Vec<MonthRow>>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            MonthsQuery,
            CarReport,
            DerivedCosts,
            PriceSnapshot,
            MonthRow,
            IncomeRow,
            ExpenseRow,
            LoanAdjustmentRow,
            crate::handlers::cars::CreateCarRequest,
            crate::handlers::cars::UpdateCarRequest,
            crate::handlers::price_settings::UpdatePriceSettingsRequest,
            crate::handlers::price_settings::PriceSettingsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cars", description = "Car evaluation endpoints with derived cost reports"),
        (name = "months", description = "Household ledger month endpoints"),
        (name = "settings", description = "Global price settings endpoints"),
    ),
    info(
        title = "Bilbudget API",
        description = "Car total-cost-of-ownership evaluation and household ledger backend",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
