//! Error types for medscan-rx
//!
//! [`RecognitionError`] is the domain error of the recognition pipeline.
//! [`ApiError`] maps it (and request problems) onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Recognition pipeline errors
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// No vocabulary could be loaded locally or fetched remotely, or a
    /// search ran against an empty trademark index
    #[error("Vocabulary unavailable: {0}")]
    VocabularyUnavailable(String),

    /// Extractor called without a loaded vocabulary
    #[error("Ingredient vocabulary is not loaded")]
    EmptyVocabulary,

    /// Concept linking model not ready
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Network or API error while fetching remote data
    #[error("External fetch failed: {0}")]
    ExternalFetchFailed(String),

    /// Cache file could not be read, written or (de)serialized
    #[error("Cache store error: {0}")]
    Store(String),

    /// Scan record could not be persisted or queried
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type RecognitionResult<T> = Result<T, RecognitionError>;

impl From<sqlx::Error> for RecognitionError {
    fn from(err: sqlx::Error) -> Self {
        RecognitionError::Persistence(err.to_string())
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Recognition pipeline failure
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Recognition(err) => match err {
                RecognitionError::ServiceUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
                }
                RecognitionError::VocabularyUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "VOCABULARY_UNAVAILABLE")
                }
                RecognitionError::EmptyVocabulary => {
                    (StatusCode::SERVICE_UNAVAILABLE, "EMPTY_VOCABULARY")
                }
                RecognitionError::ExternalFetchFailed(_) => {
                    (StatusCode::BAD_GATEWAY, "EXTERNAL_FETCH_FAILED")
                }
                RecognitionError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
                RecognitionError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR")
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
