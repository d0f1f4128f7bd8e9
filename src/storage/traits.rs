//! Storage traits and error types
//!
//! This module defines the trait interface for the Persistent Discovery Store
//! and its associated error types.

use crate::state::Phase;
use crate::storage::{ArtifactContent, DiscoveredUrl, ScrapedArtifact, StoreStats};
use crate::url::Category;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store lock poisoned")]
    Lock,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for Persistent Discovery Store implementations
///
/// Every method takes `&self`: implementations serialize mutation internally
/// so one handle can be shared between discovery activities. The store is the
/// single source of truth for "has this URL been seen".
pub trait Storage: Send + Sync {
    // ===== Discovered URLs =====

    /// Records a discovered URL
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute, same-domain URL
    /// * `category` - Category tag from classification
    /// * `phase` - Phase that discovered the URL
    /// * `depth` - BFS distance from the seed
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly added, `false` if it was already known
    fn add_url(&self, url: &str, category: Category, phase: Phase, depth: u32)
        -> StorageResult<bool>;

    /// Checks whether a URL has already been recorded
    fn is_known(&self, url: &str) -> StorageResult<bool>;

    /// Gets the record for a URL
    fn get_url(&self, url: &str) -> StorageResult<Option<DiscoveredUrl>>;

    /// Gets every record in insertion order
    fn all_urls(&self) -> StorageResult<Vec<DiscoveredUrl>>;

    // ===== Artifacts =====

    /// Persists the content of one successful fetch
    ///
    /// # Returns
    ///
    /// `true` if the artifact was written, `false` if one already exists for the URL
    fn save_artifact(
        &self,
        url: &str,
        content: &ArtifactContent,
        phase: Phase,
        depth: u32,
        category: Category,
    ) -> StorageResult<bool>;

    /// Loads the artifact stored for a URL
    fn get_artifact(&self, url: &str) -> StorageResult<Option<ScrapedArtifact>>;

    /// Counts stored artifacts
    fn count_artifacts(&self) -> StorageResult<u64>;

    // ===== Statistics =====

    /// Recomputes aggregate statistics from the current record set
    fn stats(&self) -> StorageResult<StoreStats>;

    /// Removes every record and artifact
    fn clear(&self) -> StorageResult<()>;
}
