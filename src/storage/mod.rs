//! Storage module for the Persistent Discovery Store
//!
//! This module handles all database operations for discovery, including:
//! - SQLite database initialization and schema management
//! - Idempotent recording of discovered URLs
//! - Scrape artifact persistence keyed by URL hash
//! - Aggregate statistics recomputed from the record set

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{artifact_key, SqliteStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::Phase;
use crate::url::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a discovered URL in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredUrl {
    pub url: String,
    pub category: Category,
    pub phase: Phase,
    pub depth: u32,
    pub discovered_at: String,
}

/// Content returned by one successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactContent {
    pub title: Option<String>,
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub links: Vec<String>,
}

/// Represents a persisted scrape result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArtifact {
    pub key: String,
    pub url: String,
    pub phase: Phase,
    pub depth: u32,
    pub category: Category,
    pub fetched_at: String,
    pub content: ArtifactContent,
}

/// Aggregate view over the discovered URL set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_urls: u64,
    pub by_category: BTreeMap<Category, u64>,
    pub by_phase: BTreeMap<Phase, u64>,
    /// Timestamp of the most recent insertion
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_storage_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("discovery.db");

        let storage = open_storage(&path).unwrap();
        storage
            .add_url("https://example.com/", Category::Homepage, Phase::Foundation, 0)
            .unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("discovery.db");

        {
            let storage = open_storage(&path).unwrap();
            storage
                .add_url("https://example.com/a", Category::General, Phase::Recursive, 1)
                .unwrap();
        }

        let storage = open_storage(&path).unwrap();
        assert!(storage.is_known("https://example.com/a").unwrap());
        assert!(!storage
            .add_url("https://example.com/a", Category::General, Phase::Recursive, 1)
            .unwrap());
    }
}
