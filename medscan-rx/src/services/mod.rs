//! Remote data sources

pub mod ner_client;
pub mod openfda_client;
pub mod rxclass_client;

pub use ner_client::NerClient;
pub use openfda_client::OpenFdaClient;
pub use rxclass_client::RxClassClient;

use crate::error::{RecognitionError, RecognitionResult};
use std::time::Duration;

const USER_AGENT: &str = concat!("MedScan/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client settings for all remote sources
pub fn build_http_client(timeout: Duration) -> RecognitionResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| RecognitionError::ExternalFetchFailed(format!("HTTP client setup: {}", e)))
}
