//! Interchangeable ingredient extraction strategies
//!
//! One strategy is active per deployment, chosen by the `strategy` config
//! key. The orchestrator only sees [`ExtractionStrategy`].

use super::extractor::IngredientExtractor;
use crate::cache::VocabularyCache;
use crate::error::{RecognitionError, RecognitionResult};
use async_trait::async_trait;
use medscan_common::api::RecognizedEntity;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Name reported by `/health`
    fn name(&self) -> &'static str;

    /// Ingredient names found in `text`, possibly with repeats
    async fn extract(&self, text: &str) -> RecognitionResult<Vec<String>>;

    /// Load whatever the strategy needs ahead of the first request
    async fn warm_up(&self) -> RecognitionResult<()> {
        Ok(())
    }
}

/// Local vocabulary match
///
/// The vocabulary is loaded on first use and kept for the process lifetime.
/// A failed load leaves nothing cached, so the next request tries again.
pub struct DictionaryStrategy {
    vocabulary: VocabularyCache,
    extractor: OnceCell<IngredientExtractor>,
}

impl DictionaryStrategy {
    pub fn new(vocabulary: VocabularyCache) -> Self {
        Self {
            vocabulary,
            extractor: OnceCell::new(),
        }
    }

    async fn extractor(&self) -> RecognitionResult<&IngredientExtractor> {
        self.extractor
            .get_or_try_init(|| async {
                let names = self.vocabulary.load().await?;
                let extractor = IngredientExtractor::new(&names);
                info!(
                    entries = names.len(),
                    usable = extractor.len(),
                    "Ingredient vocabulary loaded"
                );
                Ok::<_, RecognitionError>(extractor)
            })
            .await
    }
}

#[async_trait]
impl ExtractionStrategy for DictionaryStrategy {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    async fn extract(&self, text: &str) -> RecognitionResult<Vec<String>> {
        self.extractor().await?.find(text)
    }

    async fn warm_up(&self) -> RecognitionResult<()> {
        self.extractor().await.map(|_| ())
    }
}

/// Span recognition and concept linking
#[async_trait]
pub trait EntityLinker: Send + Sync {
    async fn recognize(&self, text: &str) -> RecognitionResult<Vec<RecognizedEntity>>;

    async fn readiness(&self) -> RecognitionResult<()>;
}

/// Uses each recognized span's text as an ingredient name
pub struct ConceptLinkingStrategy {
    linker: Arc<dyn EntityLinker>,
}

impl ConceptLinkingStrategy {
    pub fn new(linker: Arc<dyn EntityLinker>) -> Self {
        Self { linker }
    }
}

#[async_trait]
impl ExtractionStrategy for ConceptLinkingStrategy {
    fn name(&self) -> &'static str {
        "concept_linking"
    }

    async fn extract(&self, text: &str) -> RecognitionResult<Vec<String>> {
        let entities = self.linker.recognize(text).await?;
        Ok(entities.into_iter().map(|entity| entity.span_text).collect())
    }

    async fn warm_up(&self) -> RecognitionResult<()> {
        self.linker.readiness().await
    }
}
