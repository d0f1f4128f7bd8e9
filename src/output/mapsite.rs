//! Mapsite JSON export
//!
//! The mapsite is the full discovered URL set, in insertion order, as a
//! single JSON document.

use crate::output::{ensure_parent, OutputResult};
use crate::storage::{DiscoveredUrl, Storage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One discovered URL in the exported document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapsiteEntry {
    pub url: String,
    pub category: String,
    pub phase: String,
    pub depth: u32,
    pub discovered_at: String,
}

impl From<&DiscoveredUrl> for MapsiteEntry {
    fn from(record: &DiscoveredUrl) -> Self {
        Self {
            url: record.url.clone(),
            category: record.category.as_str().to_string(),
            phase: record.phase.to_db_string().to_string(),
            depth: record.depth,
            discovered_at: record.discovered_at.clone(),
        }
    }
}

/// The exported mapsite document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapsiteDocument {
    pub discovered_urls: Vec<MapsiteEntry>,
    pub total_count: u64,
    pub last_updated: Option<String>,
}

/// Builds the mapsite document from the store
pub fn build_mapsite(storage: &dyn Storage) -> OutputResult<MapsiteDocument> {
    let records = storage.all_urls()?;
    let stats = storage.stats()?;

    Ok(MapsiteDocument {
        discovered_urls: records.iter().map(MapsiteEntry::from).collect(),
        total_count: stats.total_urls,
        last_updated: stats.last_updated,
    })
}

/// Writes the mapsite document to `output_path` as pretty-printed JSON
///
/// # Returns
///
/// * `Ok(u64)` - Number of URLs written
/// * `Err(OutputError)` - Failed to read the store or write the file
pub fn export_mapsite(storage: &dyn Storage, output_path: &Path) -> OutputResult<u64> {
    let document = build_mapsite(storage)?;

    ensure_parent(output_path)?;
    fs::write(output_path, serde_json::to_string_pretty(&document)?)?;

    tracing::info!(
        "Exported {} URLs to {}",
        document.total_count,
        output_path.display()
    );

    Ok(document.total_count)
}
