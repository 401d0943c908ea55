use crate::schemas::{ApiResponse, AppState, MonthsQuery};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::MonthRow;
use compute::ledger::{compute_ledger, load_financing_map, load_months_with_items, mark_current, reconcile, LedgerResult};
use tracing::{debug, error, info, instrument, trace, warn};

/// Parses an anchor in YYYY-MM form into the first day of that month.
fn parse_anchor(anchor: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{anchor}-01"), "%Y-%m-%d").ok()
}

/// Loads the full ledger and rolls it forward.
async fn derive_ledger(state: &AppState) -> Result<LedgerResult, StatusCode> {
    let months = match load_months_with_items(&state.db).await {
        Ok(months) => months,
        Err(e) => {
            error!("Failed to load ledger months: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let financing_map = match load_financing_map(&state.db).await {
        Ok(map) => map,
        Err(e) => {
            error!("Failed to load financing entries: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    Ok(compute_ledger(&months, &financing_map))
}

/// Get ledger months from the anchor month onward
#[utoipa::path(
    get,
    path = "/api/months",
    tag = "months",
    params(
        ("anchor" = Option<String>, Query, description = "Anchor month in YYYY-MM format; defaults to the current month"),
    ),
    responses(
        (status = 200, description = "Months retrieved successfully", body = ApiResponse<Vec<MonthRow>>),
        (status = 400, description = "Invalid anchor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_months(
    Query(query): Query<MonthsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthRow>>>, StatusCode> {
    trace!("Entering get_months function");

    let anchor = match &query.anchor {
        Some(raw) => match parse_anchor(raw) {
            Some(date) => date,
            None => {
                warn!("Rejected malformed anchor: {}", raw);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => Utc::now().date_naive(),
    };
    debug!("Rolling ledger forward from anchor {}", anchor);

    let result = derive_ledger(&state).await?;

    // Best-effort self-healing: the response is served from the computed
    // rows either way, and a failed write is corrected on the next read.
    if let Err(e) = reconcile(&state.db, &result.corrections).await {
        warn!("Failed to reconcile {} drifted month rows: {}", result.corrections.len(), e);
    }

    let mut rows = result.rows;
    let visible = match mark_current(&mut rows, anchor) {
        Some(idx) => rows.split_off(idx),
        None => {
            debug!("Anchor {} lies past the last ledger month", anchor);
            Vec::new()
        }
    };

    info!("Returning {} ledger months from anchor {}", visible.len(), anchor);
    Ok(Json(ApiResponse {
        data: visible,
        message: "Months retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get every ledger month without touching stored rows
#[utoipa::path(
    get,
    path = "/api/months/all",
    tag = "months",
    responses(
        (status = 200, description = "Months retrieved successfully", body = ApiResponse<Vec<MonthRow>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_all_months(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthRow>>>, StatusCode> {
    trace!("Entering get_all_months function");

    let result = derive_ledger(&state).await?;

    let mut rows = result.rows;
    mark_current(&mut rows, Utc::now().date_naive());

    info!("Returning all {} ledger months", rows.len());
    Ok(Json(ApiResponse {
        data: rows,
        message: "Months retrieved successfully".to_string(),
        success: true,
    }))
}
