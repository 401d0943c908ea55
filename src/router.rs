use crate::handlers::{
    cars::{create_car, delete_car, get_cars, update_car},
    health::health_check,
    months::{get_all_months, get_months},
    price_settings::{get_price_settings, update_price_settings},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Car CRUD routes with derived cost reports
        .route("/api/cars", get(get_cars))
        .route("/api/cars", post(create_car))
        .route("/api/cars/:car_id", put(update_car))
        .route("/api/cars/:car_id", delete(delete_car))
        // Ledger month routes
        .route("/api/months", get(get_months))
        .route("/api/months/all", get(get_all_months))
        // Global price settings
        .route("/api/settings/prices", get(get_price_settings))
        .route("/api/settings/prices", put(update_price_settings))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
