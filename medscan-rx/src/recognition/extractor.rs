//! Dictionary ingredient extraction

use super::matching::WholeWord;
use crate::error::{RecognitionError, RecognitionResult};

/// Matches text against an ingredient vocabulary
///
/// Patterns are compiled once at construction. Entries that are blank after
/// trimming are dropped and can never match.
#[derive(Debug, Clone)]
pub struct IngredientExtractor {
    matchers: Vec<WholeWord>,
}

impl IngredientExtractor {
    pub fn new(vocabulary: &[String]) -> Self {
        Self {
            matchers: vocabulary.iter().filter_map(|name| WholeWord::new(name)).collect(),
        }
    }

    /// Number of usable vocabulary entries
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Ingredients mentioned in `text`, in vocabulary order, each at most once
    pub fn find(&self, text: &str) -> RecognitionResult<Vec<String>> {
        if self.matchers.is_empty() {
            return Err(RecognitionError::EmptyVocabulary);
        }

        let mut found: Vec<String> = Vec::new();
        for matcher in &self.matchers {
            if matcher.is_match(text) && !found.iter().any(|f| f == matcher.term()) {
                found.push(matcher.term().to_string());
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_order_not_text_order() {
        let extractor =
            IngredientExtractor::new(&vocabulary(&["Paracetamol", "Caffeine", "Codeine"]));
        let found = extractor
            .find("codeine 8mg, paracetamol 500mg, CODEINE again")
            .unwrap();
        assert_eq!(found, vec!["Paracetamol", "Codeine"]);
    }

    #[test]
    fn test_no_match_is_empty_list() {
        let extractor = IngredientExtractor::new(&vocabulary(&["Ibuprofen"]));
        assert!(extractor.find("No ingredients here.").unwrap().is_empty());
        assert!(extractor.find("").unwrap().is_empty());
    }

    #[test]
    fn test_partial_words_do_not_match() {
        let extractor = IngredientExtractor::new(&vocabulary(&["Iron", "Zinc"]));
        assert!(extractor.find("Ironing board, zincite").unwrap().is_empty());
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let extractor = IngredientExtractor::new(&vocabulary(&["", "  ", "Aspirin"]));
        assert_eq!(extractor.len(), 1);
        assert_eq!(extractor.find("aspirin").unwrap(), vec!["Aspirin"]);
    }

    #[test]
    fn test_duplicate_entries_reported_once() {
        let extractor = IngredientExtractor::new(&vocabulary(&["Aspirin", "Aspirin"]));
        assert_eq!(extractor.find("Aspirin").unwrap(), vec!["Aspirin"]);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let extractor = IngredientExtractor::new(&[]);
        assert!(matches!(
            extractor.find("aspirin"),
            Err(RecognitionError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_blank_only_vocabulary_is_an_error() {
        let extractor = IngredientExtractor::new(&vocabulary(&["", "   "]));
        assert!(extractor.is_empty());
        assert!(matches!(
            extractor.find("Ibuprofen 200mg"),
            Err(RecognitionError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_find_is_idempotent() {
        let extractor = IngredientExtractor::new(&vocabulary(&["Ibuprofen", "Aspirin"]));
        let text = "Aspirin and ibuprofen";
        assert_eq!(extractor.find(text).unwrap(), extractor.find(text).unwrap());
    }
}
