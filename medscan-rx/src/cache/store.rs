//! Document stores backing the vocabulary caches
//!
//! A store holds one JSON document (the ingredient list or the trademark
//! index). Callers only see `read`/`write`, so the file can later be
//! swapped for a real key-value store without touching them.

use crate::error::{RecognitionError, RecognitionResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// Single-document store
#[async_trait]
pub trait CacheStore<T>: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet; `Err` when the stored
    /// document cannot be read or parsed.
    async fn read(&self) -> RecognitionResult<Option<T>>;

    /// Replace the stored document
    async fn write(&self, value: &T) -> RecognitionResult<()>;
}

/// JSON file store with atomic replace-on-write
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so readers never observe a half-written file. Writers
/// of one store are serialized by an async mutex.
pub struct JsonFileStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> CacheStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn read(&self) -> RecognitionResult<Option<T>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RecognitionError::Store(format!(
                    "Read {} failed: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        // A literal `null` document counts as empty
        serde_json::from_str::<Option<T>>(&content).map_err(|e| {
            RecognitionError::Store(format!("Parse {} failed: {}", self.path.display(), e))
        })
    }

    async fn write(&self, value: &T) -> RecognitionResult<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| RecognitionError::Store(format!("Serialize failed: {}", e)))?;

        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .map_err(|e| RecognitionError::Store(format!("Write task failed: {}", e)))?
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> RecognitionResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let store_err =
        |e: std::io::Error| RecognitionError::Store(format!("Write {} failed: {}", path.display(), e));

    std::fs::create_dir_all(&dir).map_err(store_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(store_err)?;
    tmp.write_all(contents).map_err(store_err)?;
    tmp.flush().map_err(store_err)?;
    tmp.persist(path).map_err(|e| store_err(e.error))?;

    Ok(())
}

/// In-process store (tests, ephemeral deployments)
pub struct MemoryStore<T> {
    value: RwLock<Option<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: T) -> Self {
        Self {
            value: RwLock::new(Some(value)),
        }
    }
}

#[async_trait]
impl<T> CacheStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    async fn read(&self) -> RecognitionResult<Option<T>> {
        Ok(self.value.read().await.clone())
    }

    async fn write(&self, value: &T) -> RecognitionResult<()> {
        *self.value.write().await = Some(value.clone());
        Ok(())
    }
}
