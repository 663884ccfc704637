//! Concept dictionary: concept id → canonical name, aliases, semantic types
//!
//! Loaded once from a JSON array of concepts:
//!
//! ```json
//! [{"concept_id": "C0020740", "canonical_name": "Ibuprofen",
//!   "aliases": ["Advil", "Motrin"], "types": ["CHEMICAL"]}]
//! ```

use super::{LinkerError, LinkerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A knowledge-base concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: String,
    pub canonical_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Semantic types; the first one labels recognized spans
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl Concept {
    /// Canonical name followed by aliases, blanks skipped
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|n| !n.trim().is_empty())
    }

    pub fn label(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Aliases that read as trade names: all-caps, or tagged "brand name"
    ///
    /// Aliases equal to the canonical name (ignoring case) are never brands.
    /// Scans every alias, not just the reported ones.
    pub fn brand_names(&self) -> Vec<String> {
        let canonical = self.canonical_name.to_lowercase();
        self.aliases
            .iter()
            .filter(|alias| {
                let lower = alias.to_lowercase();
                lower != canonical && (is_all_caps(alias) || lower.contains("brand name"))
            })
            .cloned()
            .collect()
    }
}

/// At least one cased letter, and no lowercase ones
fn is_all_caps(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// In-memory knowledge base with a lowercased name index
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    concepts: HashMap<String, Concept>,
    /// Lowercased name → concept ids carrying that name (declaration order)
    name_index: HashMap<String, Vec<String>>,
    /// Concept ids in declaration order
    order: Vec<String>,
}

impl KnowledgeBase {
    /// Build from concepts; later duplicates of a concept id are ignored
    pub fn from_concepts(concepts: Vec<Concept>) -> Self {
        let mut kb = KnowledgeBase::default();

        for concept in concepts {
            if concept.concept_id.trim().is_empty() || kb.concepts.contains_key(&concept.concept_id)
            {
                continue;
            }

            for name in concept.names() {
                let ids = kb.name_index.entry(name.to_lowercase()).or_default();
                if !ids.contains(&concept.concept_id) {
                    ids.push(concept.concept_id.clone());
                }
            }

            kb.order.push(concept.concept_id.clone());
            kb.concepts.insert(concept.concept_id.clone(), concept);
        }

        kb
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> LinkerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkerError::KnowledgeBase(format!("Read {} failed: {}", path.display(), e))
        })?;
        let concepts: Vec<Concept> = serde_json::from_str(&content).map_err(|e| {
            LinkerError::KnowledgeBase(format!("Parse {} failed: {}", path.display(), e))
        })?;

        let kb = Self::from_concepts(concepts);
        if kb.is_empty() {
            return Err(LinkerError::KnowledgeBase(format!(
                "{} contains no concepts",
                path.display()
            )));
        }

        Ok(kb)
    }

    pub fn get(&self, concept_id: &str) -> Option<&Concept> {
        self.concepts.get(concept_id)
    }

    /// Concept ids whose canonical name or alias equals `name` (case-insensitive)
    pub fn lookup_name(&self, name: &str) -> &[String] {
        self.name_index
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concepts in declaration order
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.order.iter().filter_map(|id| self.concepts.get(id))
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(id: &str, name: &str, aliases: &[&str]) -> Concept {
        Concept {
            concept_id: id.to_string(),
            canonical_name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            types: vec!["CHEMICAL".to_string()],
            definition: None,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::from_concepts(vec![concept("C1", "Ibuprofen", &["Advil"])]);
        assert_eq!(kb.lookup_name("ADVIL"), ["C1".to_string()]);
        assert_eq!(kb.lookup_name("ibuprofen"), ["C1".to_string()]);
        assert!(kb.lookup_name("aspirin").is_empty());
    }

    #[test]
    fn test_shared_alias_maps_to_all_concepts() {
        let kb = KnowledgeBase::from_concepts(vec![
            concept("C1", "Acetaminophen", &["APAP"]),
            concept("C2", "Paracetamol", &["apap"]),
        ]);
        assert_eq!(kb.lookup_name("Apap"), ["C1".to_string(), "C2".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_and_blank_names_are_skipped() {
        let kb = KnowledgeBase::from_concepts(vec![
            concept("C1", "Ibuprofen", &["  ", "Advil"]),
            concept("C1", "Shadow", &[]),
            concept("", "NoId", &[]),
        ]);
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("C1").unwrap().canonical_name, "Ibuprofen");
        assert!(kb.lookup_name("shadow").is_empty());
        assert_eq!(kb.get("C1").unwrap().names().count(), 2);
    }

    #[test]
    fn test_brand_names_from_caps_and_tagged_aliases() {
        let ibuprofen = concept(
            "C1",
            "Ibuprofen",
            &[
                "Advil",
                "MOTRIN",
                "IBUPROFEN",
                "Nurofen [Brand Name]",
                "Ibuprofen 200 MG",
                "Brufen",
                "NSAID-400",
                "123",
            ],
        );
        assert_eq!(
            ibuprofen.brand_names(),
            vec!["MOTRIN", "Nurofen [Brand Name]", "NSAID-400"]
        );
        assert!(concept("C2", "Aspirin", &["aspirin"]).brand_names().is_empty());
    }

    #[test]
    fn test_load_rejects_empty_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        assert!(matches!(
            KnowledgeBase::load(&empty),
            Err(LinkerError::KnowledgeBase(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            KnowledgeBase::load(&broken),
            Err(LinkerError::KnowledgeBase(_))
        ));

        assert!(KnowledgeBase::load(&dir.path().join("missing.json")).is_err());
    }
}
