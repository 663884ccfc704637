//! Recognition endpoint
//!
//! Accepts text already extracted from a package photo. "Nothing
//! recognized" is a normal 200 response with an empty ingredient list.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::ScanResult;
use crate::AppState;

/// POST /api/recognize request body
#[derive(Debug, Deserialize)]
pub struct RecognizeRequest {
    pub text: String,
    /// Reference of the user the scan belongs to
    #[serde(default)]
    pub owner: Option<String>,
}

/// POST /api/recognize
pub async fn recognize(
    State(state): State<AppState>,
    payload: Result<Json<RecognizeRequest>, JsonRejection>,
) -> ApiResult<Json<ScanResult>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    match state
        .orchestrator
        .process(&request.text, request.owner.as_deref())
        .await
    {
        Ok(scan) => Ok(Json(scan)),
        Err(e) => {
            tracing::error!(error = %e, "Recognition failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

/// Build recognition routes
pub fn recognize_routes() -> Router<AppState> {
    Router::new().route("/api/recognize", post(recognize))
}
