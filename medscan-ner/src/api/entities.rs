//! Entity extraction endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use medscan_common::api::{ExtractEntitiesRequest, ExtractEntitiesResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /extract_entities
///
/// Runs recognition + linking over `text`. Spans that link to nothing are
/// still returned, with an empty `umls_entities` list.
pub async fn extract_entities(
    State(state): State<AppState>,
    payload: Result<Json<ExtractEntitiesRequest>, JsonRejection>,
) -> ApiResult<Json<ExtractEntitiesResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let entities = state.linker.recognize(&request.text).await?;

    tracing::debug!(
        chars = request.text.len(),
        entities = entities.len(),
        "Extracted entities"
    );

    Ok(Json(ExtractEntitiesResponse { entities }))
}

/// Build entity extraction routes
pub fn entity_routes() -> Router<AppState> {
    Router::new().route("/extract_entities", post(extract_entities))
}
