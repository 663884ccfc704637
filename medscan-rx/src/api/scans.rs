//! Scan history endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::scans::DEFAULT_LIST_LIMIT;
use crate::error::{ApiError, ApiResult};
use crate::models::ScanRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScanListQuery {
    pub owner: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/scans?owner=<ref>&limit=<n>
///
/// Newest first. `limit` defaults to 50 and is capped at 500.
pub async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanListQuery>,
) -> ApiResult<Json<Vec<ScanRecord>>> {
    let owner = query
        .owner
        .filter(|owner| !owner.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("owner is required".to_string()))?;

    let scans = state
        .scan_store
        .list_by_owner(&owner, query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;

    Ok(Json(scans))
}

/// Build scan history routes
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/api/scans", get(list_scans))
}
