//! medscan-rx library - medication recognition microservice
//!
//! Finds active ingredients and the matching brand name in text read off
//! medication packaging, and records each scan.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod recognition;
pub mod services;

pub use crate::error::{ApiError, ApiResult, RecognitionError, RecognitionResult};

use axum::Router;
use chrono::{DateTime, Utc};
use crate::db::SqliteScanStore;
use crate::recognition::RecognitionOrchestrator;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RecognitionOrchestrator>,
    /// Scan history queries
    pub scan_store: Arc<SqliteScanStore>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last recognition failure, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(orchestrator: Arc<RecognitionOrchestrator>, scan_store: Arc<SqliteScanStore>) -> Self {
        Self {
            orchestrator,
            scan_store,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recognize_routes())
        .merge(api::scan_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
