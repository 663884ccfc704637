//! Scan database
//!
//! SQLite file under the root folder, created with its schema on first run.

pub mod scans;

pub use scans::{ScanSink, SqliteScanStore};

use crate::error::{RecognitionError, RecognitionResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the scan database
pub async fn init_database(db_path: &Path) -> RecognitionResult<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            RecognitionError::Persistence(format!(
                "Cannot create {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_scans_table(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with schema (tests, dry runs)
pub async fn init_memory_database() -> RecognitionResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_scans_table(&pool).await?;
    Ok(pool)
}

/// Idempotent
pub async fn create_scans_table(pool: &SqlitePool) -> RecognitionResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scans (
            id TEXT PRIMARY KEY,
            owner TEXT,
            raw_text TEXT NOT NULL,
            active_ingredients TEXT NOT NULL,
            trademark TEXT,
            scanned_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_scans_owner ON scans(owner, scanned_at)")
        .execute(pool)
        .await?;

    Ok(())
}
