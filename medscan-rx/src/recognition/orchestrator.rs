//! Text -> ingredients -> trademark -> persisted scan

use super::dedup_preserving_order;
use super::strategy::ExtractionStrategy;
use super::trademark::TrademarkResolver;
use crate::db::ScanSink;
use crate::error::RecognitionResult;
use crate::models::{ScanRecord, ScanResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one recognition request end to end
///
/// Stages run in order and the first failure aborts the request. Nothing is
/// retried and a persistence failure does not undo earlier stages.
pub struct RecognitionOrchestrator {
    strategy: Arc<dyn ExtractionStrategy>,
    resolver: Arc<TrademarkResolver>,
    sink: Arc<dyn ScanSink>,
}

impl RecognitionOrchestrator {
    pub fn new(
        strategy: Arc<dyn ExtractionStrategy>,
        resolver: Arc<TrademarkResolver>,
        sink: Arc<dyn ScanSink>,
    ) -> Self {
        Self {
            strategy,
            resolver,
            sink,
        }
    }

    pub fn strategy(&self) -> &dyn ExtractionStrategy {
        self.strategy.as_ref()
    }

    pub async fn process(&self, text: &str, owner: Option<&str>) -> RecognitionResult<ScanResult> {
        let detected = self.strategy.extract(text).await?;
        let ingredients = dedup_preserving_order(detected);
        debug!(strategy = self.strategy.name(), ingredients = ?ingredients, "Ingredients extracted");

        let trademark = self.resolver.resolve(&ingredients, text).await?;
        debug!(trademark = ?trademark, "Trademark resolved");

        let scan = ScanResult::new(text.to_string(), ingredients, trademark);
        self.sink.save(&ScanRecord::from_result(&scan, owner)).await?;

        info!(
            scan_id = %scan.id,
            ingredients = scan.active_ingredients.len(),
            trademark = scan.trademark.as_deref().unwrap_or("-"),
            "Scan recognized"
        );
        Ok(scan)
    }
}
