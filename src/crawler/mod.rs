//! Crawler module for multi-phase discovery
//!
//! This module contains the core discovery logic, including:
//! - Fetch, interaction, and credentials collaborators
//! - HTML parsing and link extraction
//! - The breadth-first frontier scheduler
//! - Overall phase coordination

mod coordinator;
mod credentials;
mod fetcher;
mod interaction;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, DiscoveryContext, DiscoveryReport, PhaseReport};
pub use credentials::{CredentialProvider, Credentials, StaticCredentials};
pub use fetcher::{
    build_http_client, FetchError, FetchResponse, HttpFetcher, PageFetcher, RequestHeaders,
};
pub use interaction::{HttpInteractor, InteractionSettings, Interactor};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{DrainSummary, FrontierEntry, Offer, PageOutcome, Scheduler};

use crate::config::Config;
use crate::storage::Storage;
use crate::Result;
use std::sync::Arc;

/// Runs a complete discovery with the bundled HTTP collaborators
///
/// This is the main entry point for starting a run. It will:
/// 1. Build the HTTP client, fetcher, interactor, and credentials
/// 2. Fetch the seed and queue its links
/// 3. Drain the frontier breadth-first
/// 4. Run interaction sessions over sampled pages
/// 5. Validate numeric-ID pattern candidates
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `storage` - The Persistent Discovery Store
///
/// # Returns
///
/// * `Ok(DiscoveryReport)` - Discovery completed
/// * `Err(MapsiteError)` - The seed could not be fetched or credentials were invalid
pub async fn run_discovery(config: Config, storage: Arc<dyn Storage>) -> Result<DiscoveryReport> {
    let ctx = DiscoveryContext::from_config(config, storage)?;
    Coordinator::new(ctx).run().await
}
