//! Client for the medscan-ner concept linking service

use crate::error::{RecognitionError, RecognitionResult};
use crate::recognition::strategy::EntityLinker;
use async_trait::async_trait;
use medscan_common::api::{ExtractEntitiesRequest, ExtractEntitiesResponse, RecognizedEntity};
use reqwest::StatusCode;

pub struct NerClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl NerClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_status(status: StatusCode, what: &str) -> RecognitionResult<()> {
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(RecognitionError::ServiceUnavailable(format!(
                "Concept linker {}: model not ready",
                what
            )));
        }
        if !status.is_success() {
            return Err(RecognitionError::ExternalFetchFailed(format!(
                "Concept linker {} returned HTTP {}",
                what,
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityLinker for NerClient {
    async fn recognize(&self, text: &str) -> RecognitionResult<Vec<RecognizedEntity>> {
        let url = format!("{}/extract_entities", self.base_url);
        let request = ExtractEntitiesRequest {
            text: text.to_string(),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::ExternalFetchFailed(format!("Concept linker: {}", e)))?;

        Self::check_status(response.status(), "extract_entities")?;

        let body: ExtractEntitiesResponse = response.json().await.map_err(|e| {
            RecognitionError::ExternalFetchFailed(format!("Concept linker decode: {}", e))
        })?;

        tracing::debug!(entities = body.entities.len(), "Concept linker responded");
        Ok(body.entities)
    }

    async fn readiness(&self) -> RecognitionResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.http_client.get(&url).send().await.map_err(|e| {
            RecognitionError::ServiceUnavailable(format!("Concept linker unreachable: {}", e))
        })?;
        Self::check_status(response.status(), "health")
    }
}
