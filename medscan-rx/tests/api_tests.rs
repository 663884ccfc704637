//! Integration tests for medscan-rx HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint shape
//! - Recognition round trip with persisted scan history
//! - "No match" as a successful response
//! - Vocabulary outage mapped to 503
//! - Request validation

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use medscan_rx::cache::{MemoryStore, VocabularyCache, VocabularySource};
use medscan_rx::db::{init_memory_database, SqliteScanStore};
use medscan_rx::recognition::{
    BrandSource, DictionaryStrategy, RecognitionOrchestrator, TrademarkIndex, TrademarkResolver,
};
use medscan_rx::{build_router, AppState, RecognitionError, RecognitionResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

struct FixedVocabulary(Option<Vec<&'static str>>);

#[async_trait]
impl VocabularySource for FixedVocabulary {
    async fn fetch(&self) -> RecognitionResult<Vec<String>> {
        match &self.0 {
            Some(names) => Ok(names.iter().map(|s| s.to_string()).collect()),
            None => Err(RecognitionError::ExternalFetchFailed("HTTP 502".to_string())),
        }
    }
}

struct FixedBrands;

#[async_trait]
impl BrandSource for FixedBrands {
    async fn fetch_brands(&self, ingredient: &str) -> RecognitionResult<Vec<String>> {
        Ok(match ingredient {
            "Ibuprofen" => vec!["Advil".to_string(), "Motrin".to_string()],
            "Acetaminophen" => vec!["Tylenol".to_string()],
            _ => Vec::new(),
        })
    }
}

async fn setup_app(vocabulary: Option<Vec<&'static str>>) -> axum::Router {
    let vocabulary = VocabularyCache::new(
        "ingredients",
        Arc::new(MemoryStore::<Vec<String>>::new()),
        Arc::new(FixedVocabulary(vocabulary)),
    );
    let resolver = TrademarkResolver::new(
        Arc::new(MemoryStore::<TrademarkIndex>::new()),
        Arc::new(FixedBrands),
    );
    let scan_store = Arc::new(SqliteScanStore::new(init_memory_database().await.unwrap()));

    let orchestrator = RecognitionOrchestrator::new(
        Arc::new(DictionaryStrategy::new(vocabulary)),
        Arc::new(resolver),
        scan_store.clone(),
    );
    build_router(AppState::new(Arc::new(orchestrator), scan_store))
}

fn default_vocabulary() -> Option<Vec<&'static str>> {
    Some(vec!["Ibuprofen", "Caffeine", "Acetaminophen"])
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_strategy() {
    let app = setup_app(default_vocabulary()).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "medscan-rx");
    assert_eq!(body["strategy"], "dictionary");
    assert!(body["uptime_seconds"].is_u64());
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn test_recognize_and_list_history() {
    let app = setup_app(default_vocabulary()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/recognize",
            &json!({"text": "ADVIL Ibuprofen 200 mg with caffeine", "owner": "user-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let scan = body_json(response).await;
    assert_eq!(scan["active_ingredients"], json!(["Ibuprofen", "Caffeine"]));
    assert_eq!(scan["trademark"], "Advil");
    assert_eq!(scan["raw_text"], "ADVIL Ibuprofen 200 mg with caffeine");
    assert!(scan["id"].is_string());
    assert!(scan["timestamp"].is_string());

    let response = app
        .oneshot(get("/api/scans?owner=user-1&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let history = body_json(response).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], scan["id"]);
    assert_eq!(history[0]["owner"], "user-1");
    assert_eq!(history[0]["trademark"], "Advil");
}

#[tokio::test]
async fn test_no_match_is_success() {
    let app = setup_app(default_vocabulary()).await;

    let response = app
        .oneshot(post_json("/api/recognize", &json!({"text": "Vitamin-free text"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let scan = body_json(response).await;
    assert_eq!(scan["active_ingredients"], json!([]));
    assert!(scan["trademark"].is_null());
}

#[tokio::test]
async fn test_vocabulary_outage_is_service_unavailable() {
    let app = setup_app(None).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/recognize", &json!({"text": "Ibuprofen"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VOCABULARY_UNAVAILABLE");

    let health = body_json(app.oneshot(get("/health")).await.unwrap()).await;
    assert!(health["last_error"]
        .as_str()
        .unwrap()
        .contains("Vocabulary unavailable"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_app(default_vocabulary()).await;

    let response = app
        .oneshot(post_json("/api/recognize", &json!({"body": "missing text"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_scan_history_requires_owner() {
    let app = setup_app(default_vocabulary()).await;

    let response = app.oneshot(get("/api/scans")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
