//! openFDA drug label brand lookup

use crate::error::{RecognitionError, RecognitionResult};
use crate::recognition::dedup_preserving_order;
use crate::recognition::trademark::BrandSource;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

pub const OPENFDA_LABEL_URL: &str = "https://api.fda.gov/drug/label.json";

/// Labels fetched per ingredient
const LABEL_LIMIT: &str = "100";

#[derive(Debug, Default, Deserialize)]
pub struct LabelResponse {
    #[serde(default)]
    pub results: Vec<Label>,
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub openfda: Option<OpenFdaFields>,
}

#[derive(Debug, Deserialize)]
pub struct OpenFdaFields {
    #[serde(default)]
    pub brand_name: Vec<String>,
}

impl LabelResponse {
    /// First brand name of every label, duplicates removed
    pub fn brand_names(self) -> Vec<String> {
        dedup_preserving_order(
            self.results
                .into_iter()
                .filter_map(|label| label.openfda)
                .filter_map(|fields| fields.brand_name.into_iter().next()),
        )
    }
}

pub struct OpenFdaClient {
    http_client: reqwest::Client,
    url: String,
}

impl OpenFdaClient {
    pub fn new(http_client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl BrandSource for OpenFdaClient {
    async fn fetch_brands(&self, ingredient: &str) -> RecognitionResult<Vec<String>> {
        let search = format!("active_ingredient:\"{}\"", ingredient);
        tracing::debug!(ingredient = %ingredient, "Querying openFDA");

        let response = self
            .http_client
            .get(&self.url)
            .query(&[("search", search.as_str()), ("limit", LABEL_LIMIT)])
            .send()
            .await
            .map_err(|e| RecognitionError::ExternalFetchFailed(format!("openFDA: {}", e)))?;

        let status = response.status();
        // openFDA answers 404 when no label matches
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(RecognitionError::ExternalFetchFailed(format!(
                "openFDA returned HTTP {} for '{}'",
                status.as_u16(),
                ingredient
            )));
        }

        let body: LabelResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ExternalFetchFailed(format!("openFDA decode: {}", e)))?;

        Ok(body.brand_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_brand_per_label_deduplicated() {
        let body: LabelResponse = serde_json::from_value(json!({
            "meta": {"results": {"total": 4}},
            "results": [
                {"openfda": {"brand_name": ["BrandA", "BrandA Extra"]}},
                {"openfda": {"brand_name": ["BrandB"]}},
                {"openfda": {}},
                {"id": "no-openfda-section"},
                {"openfda": {"brand_name": ["BrandA"]}}
            ]
        }))
        .unwrap();

        assert_eq!(body.brand_names(), vec!["BrandA", "BrandB"]);
    }
}
