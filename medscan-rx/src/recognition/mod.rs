//! Ingredient and trademark recognition

pub mod extractor;
pub mod matching;
pub mod orchestrator;
pub mod strategy;
pub mod trademark;

pub use extractor::IngredientExtractor;
pub use orchestrator::RecognitionOrchestrator;
pub use strategy::{ConceptLinkingStrategy, DictionaryStrategy, EntityLinker, ExtractionStrategy};
pub use trademark::{BrandSource, TrademarkIndex, TrademarkResolver};

use std::collections::HashSet;

/// Drop repeats, keeping the first occurrence of each name
pub fn dedup_preserving_order<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
