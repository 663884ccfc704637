//! medscan-ner library - concept linking microservice
//!
//! Recognizes biomedical entity spans in text and links each span to
//! scored knowledge-base concepts.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod linker;

pub use crate::error::{ApiError, ApiResult};
pub use crate::linker::ConceptLinker;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Concept linker (loaded once, read-shared afterwards)
    pub linker: Arc<ConceptLinker>,
}

impl AppState {
    pub fn new(linker: Arc<ConceptLinker>) -> Self {
        Self { linker }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::entity_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
