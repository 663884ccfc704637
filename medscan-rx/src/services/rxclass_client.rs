//! RxClass (NLM RxNav) ingredient vocabulary source

use crate::cache::VocabularySource;
use crate::error::{RecognitionError, RecognitionResult};
use async_trait::async_trait;
use serde::Deserialize;

/// All ATC class members
pub const RXCLASS_MEMBERS_URL: &str =
    "https://rxnav.nlm.nih.gov/REST/rxclass/classMembers.json?classId=0&relaSource=ATC";

#[derive(Debug, Default, Deserialize)]
pub struct ClassMembersResponse {
    #[serde(rename = "drugMemberGroup", default)]
    pub drug_member_group: Option<DrugMemberGroup>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DrugMemberGroup {
    #[serde(rename = "drugMember", default)]
    pub drug_member: Vec<DrugMember>,
}

#[derive(Debug, Deserialize)]
pub struct DrugMember {
    #[serde(rename = "minConcept")]
    pub min_concept: Option<MinConcept>,
}

#[derive(Debug, Deserialize)]
pub struct MinConcept {
    pub name: Option<String>,
}

impl ClassMembersResponse {
    /// Member names in response order; members without a name are skipped
    pub fn ingredient_names(self) -> Vec<String> {
        self.drug_member_group
            .map(|group| group.drug_member)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|member| member.min_concept.and_then(|concept| concept.name))
            .collect()
    }
}

pub struct RxClassClient {
    http_client: reqwest::Client,
    url: String,
}

impl RxClassClient {
    pub fn new(http_client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl VocabularySource for RxClassClient {
    async fn fetch(&self) -> RecognitionResult<Vec<String>> {
        tracing::debug!(url = %self.url, "Querying RxClass");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RecognitionError::ExternalFetchFailed(format!("RxClass: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::ExternalFetchFailed(format!(
                "RxClass returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: ClassMembersResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ExternalFetchFailed(format!("RxClass decode: {}", e)))?;

        let names = body.ingredient_names();
        tracing::info!(count = names.len(), "Retrieved ingredient vocabulary from RxClass");
        Ok(names)
    }
}
