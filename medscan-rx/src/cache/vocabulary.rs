//! Cached vocabulary with remote fallback
//!
//! Entries that are blank after trimming are dropped. `load()` serves the
//! locally stored list when any entries remain. Otherwise it performs
//! exactly one remote fetch, persists the result (full overwrite) and
//! returns it. There is no retry or backoff.

use super::store::CacheStore;
use crate::error::{RecognitionError, RecognitionResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Remote origin of a vocabulary
#[async_trait]
pub trait VocabularySource: Send + Sync {
    async fn fetch(&self) -> RecognitionResult<Vec<String>>;
}

/// Drop entries that are blank after trimming
fn retain_valid(vocabulary: &mut Vec<String>) {
    vocabulary.retain(|name| !name.trim().is_empty());
}

pub struct VocabularyCache {
    name: &'static str,
    store: Arc<dyn CacheStore<Vec<String>>>,
    source: Arc<dyn VocabularySource>,
}

impl VocabularyCache {
    /// `name` only appears in log lines
    pub fn new(
        name: &'static str,
        store: Arc<dyn CacheStore<Vec<String>>>,
        source: Arc<dyn VocabularySource>,
    ) -> Self {
        Self {
            name,
            store,
            source,
        }
    }

    /// Local copy if it has usable entries, remote fetch otherwise
    pub async fn load(&self) -> RecognitionResult<Vec<String>> {
        match self.store.read().await {
            Ok(Some(mut vocabulary)) => {
                retain_valid(&mut vocabulary);
                if !vocabulary.is_empty() {
                    debug!(vocabulary = self.name, "Loaded vocabulary from local cache");
                    return Ok(vocabulary);
                }
                debug!(vocabulary = self.name, "Local cache has no usable entries");
            }
            Ok(None) => debug!(vocabulary = self.name, "No local cache"),
            Err(e) => warn!(vocabulary = self.name, error = %e, "Local cache unreadable"),
        }

        self.fetch().await
    }

    /// Fetch from the remote source and overwrite the local copy
    pub async fn fetch(&self) -> RecognitionResult<Vec<String>> {
        info!(vocabulary = self.name, "Fetching vocabulary from remote source");

        let mut vocabulary = self.source.fetch().await.map_err(|e| {
            RecognitionError::VocabularyUnavailable(format!("{}: {}", self.name, e))
        })?;
        retain_valid(&mut vocabulary);

        if vocabulary.is_empty() {
            return Err(RecognitionError::VocabularyUnavailable(format!(
                "{}: remote source returned no entries",
                self.name
            )));
        }

        // The fetched copy is still usable when the local write fails
        if let Err(e) = self.store.write(&vocabulary).await {
            warn!(vocabulary = self.name, error = %e, "Failed to persist vocabulary");
        }

        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::{JsonFileStore, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        result: Option<Vec<String>>,
    }

    impl CountingSource {
        fn returning(names: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Some(names.iter().map(|s| s.to_string()).collect()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn cache(
        store: impl CacheStore<Vec<String>> + 'static,
        source: Arc<CountingSource>,
    ) -> VocabularyCache {
        VocabularyCache::new("ingredients", Arc::new(store), source)
    }

    #[async_trait]
    impl VocabularySource for CountingSource {
        async fn fetch(&self) -> RecognitionResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| RecognitionError::ExternalFetchFailed("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_fetches_once_then_serves_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active_ingredients.json");
        std::fs::write(&path, "[\"Ibuprofen\",").unwrap();

        let source = CountingSource::returning(&["Ibuprofen", "Paracetamol"]);
        let vocab = cache(JsonFileStore::new(&path), source.clone());

        let first = vocab.load().await.unwrap();
        assert_eq!(first, vec!["Ibuprofen", "Paracetamol"]);
        assert_eq!(source.calls(), 1);

        let second = vocab.load().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(source.calls(), 1);

        let on_disk: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, first);
    }

    #[tokio::test]
    async fn test_missing_or_empty_cache_triggers_fetch() {
        let source = CountingSource::returning(&["Aspirin"]);
        let missing = cache(MemoryStore::new(), source.clone());
        assert_eq!(missing.load().await.unwrap(), vec!["Aspirin"]);
        assert_eq!(source.calls(), 1);

        let source = CountingSource::returning(&["Aspirin"]);
        let empty = cache(MemoryStore::with_value(Vec::new()), source.clone());
        assert_eq!(empty.load().await.unwrap(), vec!["Aspirin"]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_valid_cache_skips_fetch() {
        let source = CountingSource::failing();
        let codeine = cache(MemoryStore::with_value(vec!["Codeine".to_string()]), source.clone());
        assert_eq!(codeine.load().await.unwrap(), vec!["Codeine"]);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_vocabulary_unavailable() {
        let source = CountingSource::failing();
        let unreachable = cache(MemoryStore::new(), source.clone());
        assert!(matches!(
            unreachable.load().await,
            Err(RecognitionError::VocabularyUnavailable(_))
        ));
        assert_eq!(source.calls(), 1);

        let empty_remote = cache(MemoryStore::new(), CountingSource::returning(&[]));
        assert!(matches!(
            empty_remote.load().await,
            Err(RecognitionError::VocabularyUnavailable(_))
        ));

        let blank_remote = cache(MemoryStore::new(), CountingSource::returning(&["", " \t"]));
        assert!(matches!(
            blank_remote.load().await,
            Err(RecognitionError::VocabularyUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_only_cache_triggers_fetch() {
        let source = CountingSource::returning(&["Ibuprofen", "  "]);
        let store = Arc::new(MemoryStore::with_value(vec!["".to_string(), "   ".to_string()]));
        let vocab = VocabularyCache::new("ingredients", store.clone(), source.clone());

        assert_eq!(vocab.load().await.unwrap(), vec!["Ibuprofen"]);
        assert_eq!(source.calls(), 1);
        assert_eq!(store.read().await.unwrap(), Some(vec!["Ibuprofen".to_string()]));
    }
}
