//! Concept linking: recognize entity spans and link them to knowledge-base
//! concepts.
//!
//! Pipeline per request:
//! 1. [`EntityRecognizer`] finds spans (with an optional category label)
//! 2. abbreviation definitions in the text are detected (optional)
//! 3. [`CandidateGenerator`] proposes `(concept_id, score)` pairs per span
//! 4. each concept id is resolved against the [`KnowledgeBase`]
//!
//! [`ConceptLinker`] owns the loaded pipeline and its lifecycle
//! (Uninitialized → Loading → Ready).

pub mod abbreviation;
pub mod candidates;
pub mod knowledge_base;
pub mod pipeline;
pub mod recognizer;
pub mod service;

pub use abbreviation::{detect_abbreviations, Abbreviation};
pub use candidates::{CandidateGenerator, KbCandidateGenerator};
pub use knowledge_base::{Concept, KnowledgeBase};
pub use pipeline::{LinkerConfig, LinkingPipeline};
pub use recognizer::{DictionaryRecognizer, EntityRecognizer, EntitySpan};
pub use service::{ConceptLinker, LinkerState};

use thiserror::Error;

/// Concept linker errors
#[derive(Debug, Error)]
pub enum LinkerError {
    /// Model is not loaded yet (or failed to load)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Knowledge base could not be read or parsed
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// `initialize` called on a linker that is loading or ready
    #[error("Linker already initialized")]
    AlreadyInitialized,
}

pub type LinkerResult<T> = Result<T, LinkerError>;
