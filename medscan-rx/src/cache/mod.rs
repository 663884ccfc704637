//! Local vocabulary caches

pub mod store;
pub mod vocabulary;

pub use store::{CacheStore, JsonFileStore, MemoryStore};
pub use vocabulary::{VocabularyCache, VocabularySource};
