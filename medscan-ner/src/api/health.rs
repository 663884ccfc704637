//! Readiness endpoint
//!
//! Reports ok only once the concept linking model has finished loading.

use axum::{extract::State, routing::get, Json, Router};
use medscan_common::api::ReadinessResponse;

use crate::error::ApiResult;
use crate::AppState;

/// GET /health
///
/// 200 `{"status": "ok", "message": ...}` when ready, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<ReadinessResponse>> {
    state.linker.readiness().await?;

    Ok(Json(ReadinessResponse {
        status: "ok".to_string(),
        message: "Service is healthy".to_string(),
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
