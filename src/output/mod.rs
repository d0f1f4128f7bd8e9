//! Output module for discovery reports and exports
//!
//! This module handles:
//! - Printing the final report and stored statistics
//! - Exporting the discovered URL set as a mapsite JSON document
//! - Generating the markdown summary

mod mapsite;
mod markdown;
pub mod stats;

pub use mapsite::{build_mapsite, export_mapsite, MapsiteDocument, MapsiteEntry};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_report, print_statistics};

use crate::storage::StorageError;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Creates the parent directory of an output file if needed
fn ensure_parent(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
