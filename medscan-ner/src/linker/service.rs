//! Lifecycle-managed concept linker
//!
//! One `ConceptLinker` is built at startup and shared with request handlers
//! through `AppState`. Loading happens once; until it completes every
//! recognition request and readiness probe fails with `ServiceUnavailable`.

use super::pipeline::LinkingPipeline;
use super::{LinkerError, LinkerResult};
use medscan_common::api::RecognizedEntity;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Observable linker state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkerState {
    Uninitialized,
    Loading,
    Ready,
    /// Last load attempt failed; `initialize` may be called again
    Failed(String),
}

enum Slot {
    Uninitialized,
    Loading,
    Ready(Arc<LinkingPipeline>),
    Failed(String),
}

pub struct ConceptLinker {
    slot: RwLock<Slot>,
}

impl Default for ConceptLinker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptLinker {
    /// Linker with no model loaded
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// Linker that is ready immediately (tests, embedded use)
    pub fn with_pipeline(pipeline: LinkingPipeline) -> Self {
        Self {
            slot: RwLock::new(Slot::Ready(Arc::new(pipeline))),
        }
    }

    pub async fn state(&self) -> LinkerState {
        match &*self.slot.read().await {
            Slot::Uninitialized => LinkerState::Uninitialized,
            Slot::Loading => LinkerState::Loading,
            Slot::Ready(_) => LinkerState::Ready,
            Slot::Failed(reason) => LinkerState::Failed(reason.clone()),
        }
    }

    /// Load the pipeline (blocking work runs off the async runtime)
    ///
    /// Only valid from `Uninitialized` or `Failed`.
    pub async fn initialize<F>(&self, load: F) -> LinkerResult<()>
    where
        F: FnOnce() -> LinkerResult<LinkingPipeline> + Send + 'static,
    {
        {
            let mut slot = self.slot.write().await;
            match &*slot {
                Slot::Uninitialized | Slot::Failed(_) => *slot = Slot::Loading,
                Slot::Loading | Slot::Ready(_) => return Err(LinkerError::AlreadyInitialized),
            }
        }

        info!("Loading concept linking model...");

        let loaded = tokio::task::spawn_blocking(load)
            .await
            .unwrap_or_else(|e| Err(LinkerError::KnowledgeBase(format!("Loader panicked: {}", e))));

        let mut slot = self.slot.write().await;
        match loaded {
            Ok(pipeline) => {
                *slot = Slot::Ready(Arc::new(pipeline));
                info!("Concept linking model loaded");
                Ok(())
            }
            Err(e) => {
                error!("Concept linking model failed to load: {}", e);
                *slot = Slot::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Ok once the model is ready
    pub async fn readiness(&self) -> LinkerResult<()> {
        self.pipeline().await.map(|_| ())
    }

    /// Recognize and link entities in `text`
    pub async fn recognize(&self, text: &str) -> LinkerResult<Vec<RecognizedEntity>> {
        let pipeline = self.pipeline().await?;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || pipeline.process(&text))
            .await
            .map_err(|e| LinkerError::ServiceUnavailable(format!("Recognition task failed: {}", e)))
    }

    async fn pipeline(&self) -> LinkerResult<Arc<LinkingPipeline>> {
        match &*self.slot.read().await {
            Slot::Ready(pipeline) => Ok(Arc::clone(pipeline)),
            Slot::Uninitialized => Err(LinkerError::ServiceUnavailable(
                "Model not loaded yet".to_string(),
            )),
            Slot::Loading => Err(LinkerError::ServiceUnavailable(
                "Model is loading".to_string(),
            )),
            Slot::Failed(reason) => Err(LinkerError::ServiceUnavailable(format!(
                "Model failed to load: {}",
                reason
            ))),
        }
    }
}
