//! Request/response types of the concept-linking API
//!
//! Field names on the wire follow the recognition endpoint contract:
//! an entity's span is `text`, its candidates are `umls_entities`, and a
//! candidate's identifier is `cui`.

use serde::{Deserialize, Serialize};

/// POST /extract_entities request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractEntitiesRequest {
    pub text: String,
}

/// POST /extract_entities response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractEntitiesResponse {
    pub entities: Vec<RecognizedEntity>,
}

/// A span of text recognized as an entity, with its linked concepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    /// The span as it appears in the input text
    #[serde(rename = "text")]
    pub span_text: String,
    /// Category assigned by the recognizer (e.g. "CHEMICAL")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Candidate concepts, best first. Empty when nothing could be linked.
    #[serde(rename = "umls_entities", default)]
    pub candidate_concepts: Vec<LinkedConcept>,
}

impl RecognizedEntity {
    pub fn new(span_text: impl Into<String>, label: Option<String>) -> Self {
        Self {
            span_text: span_text.into(),
            label,
            candidate_concepts: Vec::new(),
        }
    }
}

/// A knowledge-base concept linked to a span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedConcept {
    /// Concept unique identifier
    #[serde(rename = "cui", default)]
    pub concept_id: String,
    /// Link confidence (0.0-1.0)
    #[serde(default)]
    pub score: f64,
    pub canonical_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Aliases that look like trade names
    #[serde(default)]
    pub brand_names: Vec<String>,
}

impl LinkedConcept {
    /// Create a linked concept with the score clamped to 0.0-1.0
    pub fn new(
        concept_id: impl Into<String>,
        score: f64,
        canonical_name: impl Into<String>,
        aliases: Vec<String>,
    ) -> Self {
        Self {
            concept_id: concept_id.into(),
            score: score.clamp(0.0, 1.0),
            canonical_name: canonical_name.into(),
            aliases,
            brand_names: Vec::new(),
        }
    }

    pub fn with_brand_names(mut self, brand_names: Vec<String>) -> Self {
        self.brand_names = brand_names;
        self
    }
}

/// GET /health body once the linker is ready
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_serializes_with_wire_names() {
        let mut entity = RecognizedEntity::new("advil", Some("CHEMICAL".to_string()));
        entity.candidate_concepts.push(LinkedConcept::new(
            "C0000870",
            0.95,
            "Ibuprofen",
            vec!["Advil".to_string()],
        )
        .with_brand_names(vec!["ADVIL".to_string()]));

        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "advil",
                "label": "CHEMICAL",
                "umls_entities": [{
                    "cui": "C0000870",
                    "score": 0.95,
                    "canonical_name": "Ibuprofen",
                    "aliases": ["Advil"],
                    "brand_names": ["ADVIL"]
                }]
            })
        );
    }

    #[test]
    fn test_entity_without_cui_or_label_deserializes() {
        // Deployments that omit cui/score/label must still decode
        let value = json!({
            "text": "aspirin",
            "umls_entities": [{"canonical_name": "Aspirin", "aliases": []}]
        });
        let entity: RecognizedEntity = serde_json::from_value(value).unwrap();
        assert_eq!(entity.label, None);
        assert_eq!(entity.candidate_concepts[0].concept_id, "");
        assert_eq!(entity.candidate_concepts[0].score, 0.0);
        assert!(entity.candidate_concepts[0].brand_names.is_empty());
    }

    #[test]
    fn test_linked_concept_clamps_score() {
        assert_eq!(LinkedConcept::new("C1", 1.7, "x", vec![]).score, 1.0);
        assert_eq!(LinkedConcept::new("C1", -0.2, "x", vec![]).score, 0.0);
    }
}
