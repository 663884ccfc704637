//! Candidate generation: mention → scored knowledge-base concepts

use super::knowledge_base::KnowledgeBase;
use std::collections::HashMap;
use std::sync::Arc;

/// Proposes `(concept_id, score)` pairs for a mention, best first
pub trait CandidateGenerator: Send + Sync {
    fn candidates(&self, mention: &str) -> Vec<(String, f64)>;
}

/// Scores every concept by its best-matching name
///
/// An exact (case-insensitive) name hit scores 1.0; otherwise the
/// Jaro-Winkler similarity of the lowercased strings is used. Candidates
/// below `min_similarity` are dropped.
pub struct KbCandidateGenerator {
    kb: Arc<KnowledgeBase>,
    min_similarity: f64,
}

impl KbCandidateGenerator {
    pub fn new(kb: Arc<KnowledgeBase>, min_similarity: f64) -> Self {
        Self {
            kb,
            min_similarity: min_similarity.clamp(0.0, 1.0),
        }
    }
}

impl CandidateGenerator for KbCandidateGenerator {
    fn candidates(&self, mention: &str) -> Vec<(String, f64)> {
        let mention = mention.trim().to_lowercase();
        if mention.is_empty() {
            return Vec::new();
        }

        let mut best: HashMap<&str, f64> = HashMap::new();

        for id in self.kb.lookup_name(&mention) {
            best.insert(id.as_str(), 1.0);
        }

        for concept in self.kb.concepts() {
            if best.contains_key(concept.concept_id.as_str()) {
                continue;
            }
            let score = concept
                .names()
                .map(|name| strsim::jaro_winkler(&mention, &name.to_lowercase()))
                .fold(0.0_f64, f64::max);
            if score >= self.min_similarity {
                best.insert(concept.concept_id.as_str(), score);
            }
        }

        let mut ranked: Vec<(String, f64)> = best
            .into_iter()
            .map(|(id, score)| (id.to_string(), score))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}
