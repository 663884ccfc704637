//! Ingredient to trademark resolution
//!
//! Brand names are looked up per ingredient and accumulated in a persisted
//! [`TrademarkIndex`]. The index only grows: ingredients already present are
//! never re-fetched, even when their brand list is empty.

use super::dedup_preserving_order;
use super::matching::WholeWord;
use crate::cache::CacheStore;
use crate::error::{RecognitionError, RecognitionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Ingredient name -> brand names, in stored order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrademarkIndex(BTreeMap<String, Vec<String>>);

impl TrademarkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.0.contains_key(ingredient)
    }

    pub fn brands(&self, ingredient: &str) -> Option<&[String]> {
        self.0.get(ingredient).map(Vec::as_slice)
    }

    /// Record brands for an ingredient; existing entries are kept as they are
    pub fn insert_if_absent(&mut self, ingredient: String, brands: Vec<String>) -> bool {
        if self.0.contains_key(&ingredient) {
            return false;
        }
        self.0.insert(ingredient, brands);
        true
    }

    /// Ingredients with no entry yet, first-seen order
    pub fn missing(&self, ingredients: &[String]) -> Vec<String> {
        dedup_preserving_order(
            ingredients
                .iter()
                .filter(|ingredient| !self.contains(ingredient))
                .cloned(),
        )
    }

    /// First brand mentioned in `text`
    ///
    /// Ingredients are tried in the order given, and each ingredient's brands
    /// in stored order. Where the brand occurs in the text does not matter.
    pub fn search(&self, text: &str, ingredients: &[String]) -> RecognitionResult<Option<String>> {
        if self.is_empty() {
            return Err(RecognitionError::VocabularyUnavailable(
                "Trademark index is not loaded".to_string(),
            ));
        }

        for ingredient in ingredients {
            let Some(brands) = self.brands(ingredient) else {
                continue;
            };
            for brand in brands {
                if WholeWord::new(brand).is_some_and(|w| w.is_match(text)) {
                    debug!(ingredient = %ingredient, trademark = %brand, "Trademark matched");
                    return Ok(Some(brand.clone()));
                }
            }
        }
        Ok(None)
    }
}

/// Remote brand lookup, one query per ingredient
#[async_trait]
pub trait BrandSource: Send + Sync {
    async fn fetch_brands(&self, ingredient: &str) -> RecognitionResult<Vec<String>>;
}

pub struct TrademarkResolver {
    store: Arc<dyn CacheStore<TrademarkIndex>>,
    source: Arc<dyn BrandSource>,
    merge_lock: Mutex<()>,
}

impl TrademarkResolver {
    pub fn new(store: Arc<dyn CacheStore<TrademarkIndex>>, source: Arc<dyn BrandSource>) -> Self {
        Self {
            store,
            source,
            merge_lock: Mutex::new(()),
        }
    }

    /// Best trademark for `ingredients` found in `text`
    ///
    /// Brand lookups for unknown ingredients never fail the call; a failed
    /// lookup is recorded as "no brands". Failing to persist the grown index
    /// does.
    pub async fn resolve(
        &self,
        ingredients: &[String],
        text: &str,
    ) -> RecognitionResult<Option<String>> {
        let mut index = self.read_index().await;

        let missing = index.missing(ingredients);
        if !missing.is_empty() {
            let fetched = self.fetch_missing(&missing).await;
            index = self.merge_and_persist(fetched).await?;
        }

        if index.is_empty() {
            return Ok(None);
        }
        index.search(text, ingredients)
    }

    /// Current index; unreadable storage counts as empty
    pub async fn read_index(&self) -> TrademarkIndex {
        match self.store.read().await {
            Ok(Some(index)) => index,
            Ok(None) => TrademarkIndex::new(),
            Err(e) => {
                warn!(error = %e, "Trademark index unreadable, starting empty");
                TrademarkIndex::new()
            }
        }
    }

    async fn fetch_missing(&self, missing: &[String]) -> Vec<(String, Vec<String>)> {
        let mut fetched = Vec::with_capacity(missing.len());
        for ingredient in missing {
            let brands = match self.source.fetch_brands(ingredient).await {
                Ok(brands) => dedup_preserving_order(brands),
                Err(e) => {
                    warn!(
                        ingredient = %ingredient,
                        error = %e,
                        "Brand lookup failed, recording no brands"
                    );
                    Vec::new()
                }
            };
            info!(ingredient = %ingredient, count = brands.len(), "Fetched trademarks");
            fetched.push((ingredient.clone(), brands));
        }
        fetched
    }

    /// Merge into the latest stored index and write it back
    ///
    /// Re-reading under the lock keeps entries added by concurrent resolutions.
    async fn merge_and_persist(
        &self,
        fetched: Vec<(String, Vec<String>)>,
    ) -> RecognitionResult<TrademarkIndex> {
        let _guard = self.merge_lock.lock().await;

        let mut index = self.read_index().await;
        for (ingredient, brands) in fetched {
            index.insert_if_absent(ingredient, brands);
        }
        self.store.write(&index).await?;

        debug!(ingredients = index.len(), "Trademark index persisted");
        Ok(index)
    }
}
