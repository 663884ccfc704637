//! Scan persistence

use crate::error::{RecognitionError, RecognitionResult};
use crate::models::ScanRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Default page size for scan listings
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Upper bound for scan listings
pub const MAX_LIST_LIMIT: u32 = 500;

/// Receives finished scans
#[async_trait]
pub trait ScanSink: Send + Sync {
    async fn save(&self, record: &ScanRecord) -> RecognitionResult<()>;
}

pub struct SqliteScanStore {
    pool: SqlitePool,
}

impl SqliteScanStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scans for `owner`, newest first
    pub async fn list_by_owner(&self, owner: &str, limit: u32) -> RecognitionResult<Vec<ScanRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner, raw_text, active_ingredients, trademark, scanned_at
            FROM scans
            WHERE owner = ?
            ORDER BY scanned_at DESC
            LIMIT ?
            "#,
        )
        .bind(owner)
        .bind(limit.min(MAX_LIST_LIMIT) as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &SqliteRow) -> RecognitionResult<ScanRecord> {
    let id: String = row.get("id");
    let ingredients: String = row.get("active_ingredients");
    let scanned_at: String = row.get("scanned_at");

    Ok(ScanRecord {
        id: Uuid::parse_str(&id)
            .map_err(|e| RecognitionError::Persistence(format!("Bad scan id: {}", e)))?,
        owner: row.get("owner"),
        raw_text: row.get("raw_text"),
        active_ingredients: serde_json::from_str(&ingredients)
            .map_err(|e| RecognitionError::Persistence(format!("Bad ingredient list: {}", e)))?,
        trademark: row.get("trademark"),
        scanned_at: DateTime::parse_from_rfc3339(&scanned_at)
            .map_err(|e| RecognitionError::Persistence(format!("Bad timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl ScanSink for SqliteScanStore {
    async fn save(&self, record: &ScanRecord) -> RecognitionResult<()> {
        let ingredients = serde_json::to_string(&record.active_ingredients)
            .map_err(|e| RecognitionError::Persistence(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO scans (id, owner, raw_text, active_ingredients, trademark, scanned_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.owner)
        .bind(&record.raw_text)
        .bind(ingredients)
        .bind(&record.trademark)
        .bind(record.scanned_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(scan_id = %record.id, "Scan saved");
        Ok(())
    }
}
