//! Recognition result records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one recognition request
///
/// Built once by the orchestrator and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: Uuid,
    pub raw_text: String,
    /// Unique, in first-detection order
    pub active_ingredients: Vec<String>,
    pub trademark: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(raw_text: String, active_ingredients: Vec<String>, trademark: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_text,
            active_ingredients,
            trademark,
            timestamp: Utc::now(),
        }
    }
}

/// Persisted scan, as listed back to its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub owner: Option<String>,
    pub raw_text: String,
    pub active_ingredients: Vec<String>,
    pub trademark: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    pub fn from_result(scan: &ScanResult, owner: Option<&str>) -> Self {
        Self {
            id: scan.id,
            owner: owner.map(str::to_string),
            raw_text: scan.raw_text.clone(),
            active_ingredients: scan.active_ingredients.clone(),
            trademark: scan.trademark.clone(),
            scanned_at: scan.timestamp,
        }
    }
}
