//! Configuration module for Deep-Mapsite
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use deep_mapsite::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mapsite.toml")).unwrap();
//! println!("Discovering under: {}", config.base_domain());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuthConfig, Config, CrawlerConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
