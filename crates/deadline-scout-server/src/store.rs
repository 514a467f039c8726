//! Tabular result store backed by SQLite.
//!
//! One row per enriched result, with the same columns a spreadsheet export
//! would carry: title, link, submission flag and the expiry dates joined by
//! `", "`.

use anyhow::{Context, Result};
use chrono::Utc;
use deadline_scout::EnrichedResult;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// A persisted result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRow {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub has_submission_links: bool,
    pub expiry_dates: String,
    pub recorded_at: String,
}

/// Append-only result table.
pub struct ResultStore {
    db: Connection,
}

impl ResultStore {
    /// Open or create a store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let db = Connection::open(path)
            .with_context(|| format!("failed to open result store: {}", path.display()))?;
        Self::init(db)
    }

    /// Volatile store, mostly for tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory().context("failed to open in-memory store")?)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                has_submission_links INTEGER NOT NULL,
                expiry_dates TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );",
        )
        .context("failed to create results table")?;

        Ok(Self { db })
    }

    /// Insert all results in a single transaction. Returns the number written.
    pub fn append(&mut self, results: &[EnrichedResult]) -> Result<usize> {
        let recorded_at = Utc::now().to_rfc3339();
        let tx = self.db.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO results (title, link, has_submission_links, expiry_dates, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for result in results {
                stmt.execute(rusqlite::params![
                    result.title,
                    result.link,
                    result.has_submission_links,
                    result.expiry_dates_joined(),
                    recorded_at,
                ])?;
            }
        }
        tx.commit().context("failed to commit results")?;

        tracing::debug!(rows = results.len(), "results stored");
        Ok(results.len())
    }

    /// Most recent rows first.
    pub fn rows(&self, limit: usize) -> Result<Vec<StoredRow>> {
        // SQLite reads a negative LIMIT as "no limit".
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.db.prepare(
            "SELECT id, title, link, has_submission_links, expiry_dates, recorded_at
             FROM results ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(rusqlite::params![limit], |row| {
                Ok(StoredRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    link: row.get(2)?,
                    has_submission_links: row.get(3)?,
                    expiry_dates: row.get(4)?,
                    recorded_at: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
