//! Discovery coordinator - phase orchestration logic
//!
//! This module sequences the four discovery phases over one shared,
//! explicitly constructed context:
//! 1. Foundation: single fetch of the seed URL
//! 2. Recursive: breadth-first drain of the frontier
//! 3. Interactive: interaction sessions over sampled pages per category
//! 4. Pattern completion: numeric-ID candidates validated by fetch
//!
//! Only a failed or empty seed fetch aborts a run; every other failure is
//! isolated to the URL it happened on.

use crate::config::Config;
use crate::crawler::credentials::{CredentialProvider, Credentials, StaticCredentials};
use crate::crawler::fetcher::{
    build_http_client, FetchResponse, HttpFetcher, PageFetcher, RequestHeaders,
};
use crate::crawler::interaction::{HttpInteractor, InteractionSettings, Interactor};
use crate::crawler::scheduler::{FrontierEntry, Scheduler};
use crate::patterns::analyze_patterns;
use crate::state::Phase;
use crate::storage::{DiscoveredUrl, Storage, StoreStats};
use crate::url::{parse_seed_url, resolve_links, Category, Classifier};
use crate::{MapsiteError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a discovery run needs, passed by reference to each phase
pub struct DiscoveryContext {
    config: Config,
    base_url: Url,
    classifier: Classifier,
    storage: Arc<dyn Storage>,
    fetcher: Arc<dyn PageFetcher>,
    interactor: Arc<dyn Interactor>,
    credentials: Arc<dyn CredentialProvider>,
}

impl DiscoveryContext {
    /// Creates a context from explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `storage` - The Persistent Discovery Store
    /// * `fetcher` - Fetch collaborator
    /// * `interactor` - Interaction collaborator
    /// * `credentials` - Credentials collaborator
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        fetcher: Arc<dyn PageFetcher>,
        interactor: Arc<dyn Interactor>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let base_url = parse_seed_url(&config.site.base_url)?;
        let classifier = Classifier::new(config.base_domain());

        Ok(Self {
            config,
            base_url,
            classifier,
            storage,
            fetcher,
            interactor,
            credentials,
        })
    }

    /// Creates a context with the bundled HTTP collaborators
    ///
    /// The fetcher and interactor share one reqwest client.
    pub fn from_config(config: Config, storage: Arc<dyn Storage>) -> Result<Self> {
        let client = build_http_client(&config.site.user_agent, config.crawler.request_timeout())?;

        let fetcher = Arc::new(HttpFetcher::new(client.clone()));
        let interactor = Arc::new(HttpInteractor::new(
            client,
            InteractionSettings {
                max_pagination_clicks: config.crawler.max_pagination_clicks,
                search_terms: config.crawler.search_terms.clone(),
            },
        ));
        let credentials = Arc::new(StaticCredentials::new(
            config.auth.clone(),
            config.site.user_agent.clone(),
        ));

        Self::new(config, storage, fetcher, interactor, credentials)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The seed URL, also the base for link resolution
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }

    pub fn interactor(&self) -> &dyn Interactor {
        self.interactor.as_ref()
    }
}

/// Output of one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    /// URLs newly added to the store during the phase
    pub discovered: u64,
    pub elapsed: Duration,
}

/// Final summary of a discovery run
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub phases: Vec<PhaseReport>,
    pub stats: StoreStats,
    pub failed_urls: Vec<String>,
    /// The runtime guard stopped the run before every phase completed
    pub stopped_early: bool,
    pub elapsed: Duration,
}

impl DiscoveryReport {
    /// Returns the report for a phase, if it ran
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Main discovery coordinator structure
pub struct Coordinator {
    ctx: DiscoveryContext,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator over a context
    pub fn new(ctx: DiscoveryContext) -> Self {
        let scheduler = Scheduler::new(ctx.config.crawler.max_queue_size);
        Self { ctx, scheduler }
    }

    pub fn context(&self) -> &DiscoveryContext {
        &self.ctx
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs all four phases in order
    ///
    /// # Returns
    ///
    /// * `Ok(DiscoveryReport)` - Per-phase counts, store statistics, and failed URLs
    /// * `Err(MapsiteError::SeedFailure)` - The seed fetch failed or returned no links
    /// * `Err(MapsiteError::Credentials)` - Credentials could not be acquired
    pub async fn run(&mut self) -> Result<DiscoveryReport> {
        let started = Instant::now();
        // A limit too large to represent as an Instant is treated as no limit
        let deadline = self
            .ctx
            .config
            .crawler
            .max_runtime()
            .and_then(|limit| started.checked_add(limit));

        tracing::info!("Starting discovery of {}", self.ctx.base_url);

        let credentials = self.ctx.credentials.acquire().await?;
        let headers = credentials.request_headers();

        let mut report = DiscoveryReport::default();

        for phase in Phase::all() {
            if phase != Phase::Foundation && deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!("Runtime limit reached, not starting phase {}", phase);
                report.stopped_early = true;
                break;
            }

            tracing::info!("Phase {}: {}", phase.number(), phase);
            let phase_start = Instant::now();
            let before = self.total_urls();

            match phase {
                Phase::Foundation => self.foundation(&headers).await?,
                Phase::Recursive => {
                    let summary = self.scheduler.drain(&self.ctx, &headers, deadline).await;
                    tracing::info!(
                        "Recursive discovery processed {} URLs ({} skipped, {} failed)",
                        summary.dequeued,
                        summary.skipped,
                        summary.failed
                    );
                    report.stopped_early |= summary.stopped_early;
                }
                Phase::Interactive => {
                    report.stopped_early |= self.interactive(&headers, &credentials, deadline).await;
                }
                Phase::PatternCompletion => {
                    report.stopped_early |= self.pattern_completion(&headers, deadline).await;
                }
            }

            let discovered = self.total_urls().saturating_sub(before);
            tracing::info!("Phase {} complete: {} new URLs", phase, discovered);

            report.phases.push(PhaseReport {
                phase,
                discovered,
                elapsed: phase_start.elapsed(),
            });
        }

        report.stats = self.ctx.storage().stats()?;
        report.failed_urls = self.scheduler.failed_urls().to_vec();
        report.elapsed = started.elapsed();

        tracing::info!(
            "Discovery completed: {} URLs in {:?} ({} failed)",
            report.stats.total_urls,
            report.elapsed,
            report.failed_urls.len()
        );

        Ok(report)
    }

    fn total_urls(&self) -> u64 {
        match self.ctx.storage().stats() {
            Ok(stats) => stats.total_urls,
            Err(e) => {
                tracing::warn!("Failed to read store statistics: {}", e);
                0
            }
        }
    }

    /// Phase 1: fetches the seed and queues its links at depth 1
    async fn foundation(&mut self, headers: &RequestHeaders) -> Result<()> {
        let seed = self.ctx.base_url.to_string();

        let response = match self.ctx.fetcher().fetch(&seed, headers).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Seed fetch failed for {}: {}", seed, e);
                return Err(MapsiteError::SeedFailure {
                    url: seed,
                    reason: e.to_string(),
                });
            }
        };

        if response.links.is_empty() {
            tracing::error!("Seed page {} returned no links", seed);
            return Err(MapsiteError::SeedFailure {
                url: seed,
                reason: "no links found on seed page".to_string(),
            });
        }

        let entry = FrontierEntry {
            url: seed,
            depth: 0,
            category: Category::Homepage,
        };
        let outcome = self
            .scheduler
            .absorb(&self.ctx, &entry, Phase::Foundation, &response);

        tracing::info!(
            "Foundation found {} links, queued {} for recursive discovery",
            response.links.len(),
            outcome.enqueued
        );

        Ok(())
    }

    /// Phase 3: runs interaction sessions over sampled URLs per category
    ///
    /// Returns true if the runtime guard cut the phase short.
    async fn interactive(
        &mut self,
        headers: &RequestHeaders,
        credentials: &Credentials,
        deadline: Option<Instant>,
    ) -> bool {
        let records = match self.ctx.storage().all_urls() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping interactive discovery, store read failed: {}", e);
                return false;
            }
        };

        let samples = sample_per_category(records, self.ctx.config.crawler.samples_per_category);
        let user_agent = credentials
            .headers
            .get("User-Agent")
            .cloned()
            .unwrap_or_else(|| self.ctx.config.site.user_agent.clone());
        let delay = self.ctx.config.crawler.interaction_delay();

        tracing::info!("Interacting with {} sampled pages", samples.len());

        for (index, record) in samples.iter().enumerate() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!("Runtime limit reached during interactive discovery");
                return true;
            }

            tracing::debug!("Interacting with {} ({})", record.url, record.category);

            match self
                .ctx
                .interactor()
                .interact(&record.url, headers, &user_agent)
                .await
            {
                Ok(links) => {
                    let added = self.record_links(&links, Phase::Interactive, record.depth + 1);
                    if added > 0 {
                        tracing::info!("Interaction on {} added {} URLs", record.url, added);
                    }
                }
                Err(e) => tracing::debug!("Interaction failed for {}: {}", record.url, e),
            }

            if index + 1 < samples.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        false
    }

    /// Phase 4: validates pattern candidates by fetching them
    ///
    /// Returns true if the runtime guard cut the phase short.
    async fn pattern_completion(
        &mut self,
        headers: &RequestHeaders,
        deadline: Option<Instant>,
    ) -> bool {
        let records = match self.ctx.storage().all_urls() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping pattern completion, store read failed: {}", e);
                return false;
            }
        };

        let depths: HashMap<&str, u32> = records.iter().map(|r| (r.url.as_str(), r.depth)).collect();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        let templates = analyze_patterns(&urls);

        if templates.is_empty() {
            tracing::info!("No numeric URL patterns detected");
            return false;
        }

        let min_length = self.ctx.config.crawler.min_content_length;
        let delay = self.ctx.config.crawler.pattern_delay();

        for (template, pattern) in &templates {
            let depth = pattern
                .examples
                .iter()
                .filter_map(|url| depths.get(url.as_str()).copied())
                .min()
                .unwrap_or(1);

            tracing::info!(
                "Testing pattern {}: {} candidates",
                template,
                pattern.candidates.len()
            );

            let mut valid = 0;
            for candidate in &pattern.candidates {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    tracing::warn!("Runtime limit reached during pattern completion");
                    return true;
                }

                if matches!(self.ctx.storage().is_known(candidate), Ok(true)) {
                    continue;
                }

                let classification = self.ctx.classifier().classify(candidate);
                if !classification.should_enqueue() {
                    continue;
                }

                match self.ctx.fetcher().fetch(candidate, headers).await {
                    Ok(response) if response.content_length() > min_length => {
                        valid += 1;
                        let entry = FrontierEntry {
                            url: candidate.clone(),
                            depth,
                            category: classification.category,
                        };
                        self.record_candidate(&entry, &response);
                    }
                    Ok(_) => tracing::debug!("Candidate {} has too little content", candidate),
                    Err(e) => tracing::debug!("Candidate {} not found: {}", candidate, e),
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            tracing::info!("Pattern {}: {} valid candidates", template, valid);
        }

        false
    }

    /// Records a validated candidate, its artifact, and its outbound links
    fn record_candidate(&self, entry: &FrontierEntry, response: &FetchResponse) {
        let storage = self.ctx.storage();
        let phase = Phase::PatternCompletion;

        if let Err(e) = storage.add_url(&entry.url, entry.category, phase, entry.depth) {
            tracing::warn!("Failed to record {}: {}", entry.url, e);
        }
        if let Err(e) = storage.save_artifact(
            &entry.url,
            &response.to_artifact(),
            phase,
            entry.depth,
            entry.category,
        ) {
            tracing::warn!("Failed to save artifact for {}: {}", entry.url, e);
        }

        let bonus = self.record_links(&response.links, phase, entry.depth + 1);
        tracing::debug!("Valid candidate {} (+{} bonus URLs)", entry.url, bonus);
    }

    /// Classifies links and adds every enqueueable one to the store
    ///
    /// Returns the number of newly added URLs.
    fn record_links<S: AsRef<str>>(&self, links: &[S], phase: Phase, depth: u32) -> usize {
        let storage = self.ctx.storage();
        let mut added = 0;

        for link in resolve_links(links, self.ctx.base_url()) {
            let classification = self.ctx.classifier().classify(&link);
            if !classification.should_enqueue() {
                continue;
            }

            match storage.add_url(&link, classification.category, phase, depth) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to record {}: {}", link, e),
            }
        }

        added
    }
}

/// Picks up to `per_category` records from each category, in insertion order
///
/// `0` keeps every record. File downloads are never sampled.
fn sample_per_category(records: Vec<DiscoveredUrl>, per_category: usize) -> Vec<DiscoveredUrl> {
    let mut groups: BTreeMap<Category, Vec<DiscoveredUrl>> = BTreeMap::new();

    for record in records {
        if record.category == Category::FileDownloads {
            continue;
        }
        let group = groups.entry(record.category).or_default();
        if per_category == 0 || group.len() < per_category {
            group.push(record);
        }
    }

    groups.into_values().flatten().collect()
}
