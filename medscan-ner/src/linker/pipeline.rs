//! The loaded recognition + linking pipeline

use super::abbreviation::{abbreviation_map, detect_abbreviations};
use super::candidates::{CandidateGenerator, KbCandidateGenerator};
use super::knowledge_base::KnowledgeBase;
use super::recognizer::{DictionaryRecognizer, EntityRecognizer};
use super::LinkerResult;
use medscan_common::api::{LinkedConcept, RecognizedEntity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Candidate inclusion policy (`[linker]` table)
///
/// The default keeps only the top-1 candidate per span, with no score
/// threshold beyond the generator's own `min_similarity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Link abbreviations through their long form when defined in the text
    #[serde(default = "default_resolve_abbreviations")]
    pub resolve_abbreviations: bool,

    /// Maximum candidates per span (0 = unbounded)
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Drop candidates scoring below this value
    #[serde(default)]
    pub score_threshold: Option<f64>,

    /// Similarity floor for candidate generation
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Aliases reported per concept (0 = all)
    #[serde(default = "default_max_aliases")]
    pub max_aliases: usize,
}

fn default_resolve_abbreviations() -> bool {
    true
}

fn default_candidate_limit() -> usize {
    1
}

fn default_min_similarity() -> f64 {
    0.7
}

fn default_max_aliases() -> usize {
    5
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            resolve_abbreviations: default_resolve_abbreviations(),
            candidate_limit: default_candidate_limit(),
            score_threshold: None,
            min_similarity: default_min_similarity(),
            max_aliases: default_max_aliases(),
        }
    }
}

impl LinkerConfig {
    /// Candidate limit, `None` when unbounded
    pub fn limit(&self) -> Option<usize> {
        (self.candidate_limit > 0).then_some(self.candidate_limit)
    }
}

/// Recognizer, candidate generator and concept dictionary bundled together
pub struct LinkingPipeline {
    recognizer: Box<dyn EntityRecognizer>,
    generator: Box<dyn CandidateGenerator>,
    kb: Arc<KnowledgeBase>,
    config: LinkerConfig,
}

impl LinkingPipeline {
    pub fn new(
        recognizer: Box<dyn EntityRecognizer>,
        generator: Box<dyn CandidateGenerator>,
        kb: Arc<KnowledgeBase>,
        config: LinkerConfig,
    ) -> Self {
        Self {
            recognizer,
            generator,
            kb,
            config,
        }
    }

    /// Dictionary recognizer + similarity linker over one knowledge base
    pub fn from_knowledge_base(kb: KnowledgeBase, config: LinkerConfig) -> LinkerResult<Self> {
        let kb = Arc::new(kb);
        let recognizer = DictionaryRecognizer::from_knowledge_base(&kb)?;
        let generator = KbCandidateGenerator::new(Arc::clone(&kb), config.min_similarity);
        Ok(Self::new(
            Box::new(recognizer),
            Box::new(generator),
            kb,
            config,
        ))
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Recognize spans in `text` and link each one
    ///
    /// Every recognized span is returned, even when nothing links to it.
    pub fn process(&self, text: &str) -> Vec<RecognizedEntity> {
        let spans = self.recognizer.recognize(text);
        if spans.is_empty() {
            return Vec::new();
        }

        let abbreviations = if self.config.resolve_abbreviations {
            detect_abbreviations(text)
        } else {
            Vec::new()
        };
        let long_forms: HashMap<&str, &str> = abbreviation_map(&abbreviations);

        spans
            .into_iter()
            .map(|span| {
                let mention = long_forms
                    .get(span.text.as_str())
                    .copied()
                    .unwrap_or(span.text.as_str());

                let mut entity = RecognizedEntity::new(span.text.clone(), span.label);
                entity.candidate_concepts = self.link(mention);
                entity
            })
            .collect()
    }

    fn link(&self, mention: &str) -> Vec<LinkedConcept> {
        let mut candidates = self.generator.candidates(mention);
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let threshold = self.config.score_threshold;
        let limit = self.config.limit().unwrap_or(usize::MAX);

        candidates
            .into_iter()
            .filter(|(_, score)| threshold.map_or(true, |t| *score >= t))
            .filter_map(|(concept_id, score)| {
                let Some(concept) = self.kb.get(&concept_id) else {
                    tracing::debug!(concept_id = %concept_id, "Candidate missing from knowledge base");
                    return None;
                };
                let mut aliases = concept.aliases.clone();
                if self.config.max_aliases > 0 {
                    aliases.truncate(self.config.max_aliases);
                }
                Some(
                    LinkedConcept::new(
                        concept_id,
                        score,
                        concept.canonical_name.clone(),
                        aliases,
                    )
                    .with_brand_names(concept.brand_names()),
                )
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::knowledge_base::Concept;
    use crate::linker::recognizer::EntitySpan;

    /// Emits a fixed span for every occurrence of a word
    struct WordRecognizer(&'static str, Option<&'static str>);

    impl EntityRecognizer for WordRecognizer {
        fn recognize(&self, text: &str) -> Vec<EntitySpan> {
            text.match_indices(self.0)
                .map(|(start, m)| EntitySpan {
                    start,
                    end: start + m.len(),
                    text: m.to_string(),
                    label: self.1.map(str::to_string),
                })
                .collect()
        }
    }

    /// Returns fixed candidates keyed by mention
    struct FixedCandidates(Vec<(&'static str, Vec<(&'static str, f64)>)>);

    impl CandidateGenerator for FixedCandidates {
        fn candidates(&self, mention: &str) -> Vec<(String, f64)> {
            self.0
                .iter()
                .find(|(m, _)| *m == mention)
                .map(|(_, c)| c.iter().map(|(id, s)| (id.to_string(), *s)).collect())
                .unwrap_or_default()
        }
    }

    fn kb() -> Arc<KnowledgeBase> {
        let concept = |id: &str, name: &str, aliases: &[&str]| Concept {
            concept_id: id.to_string(),
            canonical_name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            types: vec![],
            definition: None,
        };
        Arc::new(KnowledgeBase::from_concepts(vec![
            concept(
                "C0000870",
                "Ibuprofen",
                &["Advil", "Motrin", "Brufen", "Nurofen", "Ibu", "MIDOL IB"],
            ),
            concept("C0000002", "Ibuprofen Lysine", &[]),
            concept("C0004057", "Aspirin", &["ASA"]),
            concept("C0000003", "Acetylsalicylic acid", &[]),
        ]))
    }

    fn pipeline(
        word: &'static str,
        candidates: Vec<(&'static str, Vec<(&'static str, f64)>)>,
        config: LinkerConfig,
    ) -> LinkingPipeline {
        LinkingPipeline::new(
            Box::new(WordRecognizer(word, Some("CHEMICAL"))),
            Box::new(FixedCandidates(candidates)),
            kb(),
            config,
        )
    }

    #[test]
    fn test_top_one_by_default_with_truncated_aliases() {
        let p = pipeline(
            "advil",
            vec![("advil", vec![("C0000870", 0.95), ("C0000002", 0.80)])],
            LinkerConfig::default(),
        );

        let entities = p.process("The patient took advil.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].span_text, "advil");
        assert_eq!(entities[0].label.as_deref(), Some("CHEMICAL"));

        let concepts = &entities[0].candidate_concepts;
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].concept_id, "C0000870");
        assert_eq!(concepts[0].score, 0.95);
        assert_eq!(concepts[0].canonical_name, "Ibuprofen");
        assert_eq!(concepts[0].aliases.len(), 5);
        assert!(concepts[0].aliases.contains(&"Advil".to_string()));
        // Brand names come from the full alias list, past the truncation
        assert_eq!(concepts[0].brand_names, vec!["MIDOL IB"]);
    }

    #[test]
    fn test_unbounded_with_threshold_keeps_descending_order() {
        let config = LinkerConfig {
            candidate_limit: 0,
            score_threshold: Some(0.5),
            max_aliases: 0,
            ..LinkerConfig::default()
        };
        let p = pipeline(
            "advil",
            vec![(
                "advil",
                vec![("C0000002", 0.80), ("C0004057", 0.30), ("C0000870", 0.95)],
            )],
            config,
        );

        let concepts = &p.process("advil")[0].candidate_concepts;
        let ids: Vec<_> = concepts.iter().map(|c| c.concept_id.as_str()).collect();
        assert_eq!(ids, ["C0000870", "C0000002"]);
        assert_eq!(concepts[0].aliases.len(), 6);
    }

    #[test]
    fn test_span_without_candidates_is_kept() {
        let p = pipeline("advil", vec![], LinkerConfig::default());
        let entities = p.process("advil and advil");
        assert_eq!(entities.len(), 2);
        assert!(entities.iter().all(|e| e.candidate_concepts.is_empty()));
    }

    #[test]
    fn test_unknown_concept_ids_are_skipped() {
        let p = pipeline(
            "advil",
            vec![("advil", vec![("C9999999", 0.99), ("C0000870", 0.9)])],
            LinkerConfig::default(),
        );
        let concepts = &p.process("advil")[0].candidate_concepts;
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].concept_id, "C0000870");
    }

    #[test]
    fn test_abbreviation_links_through_long_form() {
        let candidates = vec![
            ("ASA", vec![("C0004057", 1.0)]),
            ("acetylsalicylic acid", vec![("C0000003", 1.0)]),
        ];

        let resolved = pipeline("ASA", candidates.clone(), LinkerConfig::default());
        let entities = resolved.process("acetylsalicylic acid (ASA) twice daily; ASA 81mg");
        assert_eq!(entities.len(), 2);
        assert!(entities
            .iter()
            .all(|e| e.span_text == "ASA" && e.candidate_concepts[0].concept_id == "C0000003"));

        let literal = pipeline(
            "ASA",
            candidates,
            LinkerConfig {
                resolve_abbreviations: false,
                ..LinkerConfig::default()
            },
        );
        let entities = literal.process("acetylsalicylic acid (ASA) twice daily");
        assert_eq!(entities[0].candidate_concepts[0].concept_id, "C0004057");
    }

    #[test]
    fn test_from_knowledge_base_end_to_end() {
        let kb = KnowledgeBase::from_concepts(vec![Concept {
            concept_id: "C0000870".to_string(),
            canonical_name: "Ibuprofen".to_string(),
            aliases: vec!["Advil".to_string(), "Motrin".to_string()],
            types: vec!["CHEMICAL".to_string()],
            definition: None,
        }]);
        let p = LinkingPipeline::from_knowledge_base(kb, LinkerConfig::default()).unwrap();

        let entities = p.process("The patient took advil.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label.as_deref(), Some("CHEMICAL"));
        assert_eq!(entities[0].candidate_concepts[0].concept_id, "C0000870");
        assert_eq!(entities[0].candidate_concepts[0].score, 1.0);
    }
}
