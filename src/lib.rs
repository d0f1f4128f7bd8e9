//! Deep-Mapsite: exhaustive discovery of an authenticated website
//!
//! This crate implements a four-phase discovery engine that classifies,
//! deduplicates, and persists every reachable same-domain URL of a site,
//! expanding coverage until no new content is found.

pub mod config;
pub mod crawler;
pub mod output;
pub mod patterns;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Deep-Mapsite operations
#[derive(Debug, Error)]
pub enum MapsiteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Credential acquisition failed: {0}")]
    Credentials(String),

    #[error("Seed discovery failed for {url}: {reason}")]
    SeedFailure { url: String, reason: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Deep-Mapsite operations
pub type Result<T> = std::result::Result<T, MapsiteError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, DiscoveryContext, DiscoveryReport};
pub use patterns::{analyze_patterns, PatternTemplate};
pub use state::{Phase, UrlState};
pub use storage::{SqliteStorage, Storage};
pub use url::{Category, Classification, Classifier};
