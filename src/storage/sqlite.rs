//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! The connection sits behind a mutex so every read-modify-write runs
//! exclusively and `stats()` observes a single consistent snapshot.

use crate::state::Phase;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ArtifactContent, DiscoveredUrl, ScrapedArtifact, StoreStats};
use crate::url::Category;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Computes the stable artifact key for a URL (SHA-256, lowercase hex)
pub fn artifact_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Lock)
    }
}

fn discovered_from_row(row: &Row<'_>) -> rusqlite::Result<DiscoveredUrl> {
    Ok(DiscoveredUrl {
        url: row.get(0)?,
        category: Category::from_tag(&row.get::<_, String>(1)?).unwrap_or(Category::General),
        phase: Phase::from_db_string(&row.get::<_, String>(2)?).unwrap_or(Phase::Recursive),
        depth: row.get(3)?,
        discovered_at: row.get(4)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Discovered URLs =====

    fn add_url(
        &self,
        url: &str,
        category: Category,
        phase: Phase,
        depth: u32,
    ) -> StorageResult<bool> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO discovered_urls (url, category, phase, depth, discovered_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![url, category.as_str(), phase.to_db_string(), depth, now],
        )?;
        Ok(inserted == 1)
    }

    fn is_known(&self, url: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM discovered_urls WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn get_url(&self, url: &str) -> StorageResult<Option<DiscoveredUrl>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT url, category, phase, depth, discovered_at
                 FROM discovered_urls WHERE url = ?1",
                params![url],
                discovered_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn all_urls(&self) -> StorageResult<Vec<DiscoveredUrl>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT url, category, phase, depth, discovered_at
             FROM discovered_urls ORDER BY id",
        )?;

        let records = stmt
            .query_map([], discovered_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    // ===== Artifacts =====

    fn save_artifact(
        &self,
        url: &str,
        content: &ArtifactContent,
        phase: Phase,
        depth: u32,
        category: Category,
    ) -> StorageResult<bool> {
        let body = serde_json::to_string(content)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO artifacts (key, url, phase, depth, category, fetched_at, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                artifact_key(url),
                url,
                phase.to_db_string(),
                depth,
                category.as_str(),
                now,
                body
            ],
        )?;
        Ok(inserted == 1)
    }

    fn get_artifact(&self, url: &str) -> StorageResult<Option<ScrapedArtifact>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT key, url, phase, depth, category, fetched_at, content
                 FROM artifacts WHERE key = ?1",
                params![artifact_key(url)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((key, url, phase, depth, category, fetched_at, body)) = row else {
            return Ok(None);
        };

        Ok(Some(ScrapedArtifact {
            key,
            url,
            phase: Phase::from_db_string(&phase)
                .ok_or_else(|| StorageError::Database(format!("unknown phase '{}'", phase)))?,
            depth,
            category: Category::from_tag(&category).unwrap_or(Category::General),
            fetched_at,
            content: serde_json::from_str(&body)?,
        }))
    }

    fn count_artifacts(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM artifacts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Statistics =====

    fn stats(&self) -> StorageResult<StoreStats> {
        let conn = self.lock()?;

        let (total, last_updated): (i64, Option<String>) = conn.query_row(
            "SELECT COUNT(*), MAX(discovered_at) FROM discovered_urls",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut by_category = BTreeMap::new();
        let mut stmt =
            conn.prepare("SELECT category, COUNT(*) FROM discovered_urls GROUP BY category")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (tag, count) = row?;
            let category = Category::from_tag(&tag).unwrap_or(Category::General);
            *by_category.entry(category).or_insert(0) += count as u64;
        }

        let mut by_phase = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT phase, COUNT(*) FROM discovered_urls GROUP BY phase")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (name, count) = row?;
            if let Some(phase) = Phase::from_db_string(&name) {
                by_phase.insert(phase, count as u64);
            }
        }

        Ok(StoreStats {
            total_urls: total as u64,
            by_category,
            by_phase,
            last_updated,
        })
    }

    fn clear(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            DELETE FROM discovered_urls;
            DELETE FROM artifacts;
        ",
        )?;
        Ok(())
    }
}
