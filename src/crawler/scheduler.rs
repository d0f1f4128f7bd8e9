//! Frontier scheduler for breadth-first recursive discovery
//!
//! This module handles:
//! - The in-memory FIFO work queue of URLs to fetch
//! - Deduplication against the store and the currently queued set
//! - The failed set (reported, never retried)
//! - Draining the queue one fetch at a time with a pause between requests
//!
//! The store is authoritative: every dequeued URL is re-checked against it
//! before any fetch work is started.

use crate::crawler::coordinator::DiscoveryContext;
use crate::crawler::fetcher::{FetchResponse, RequestHeaders};
use crate::state::{Phase, UrlState};
use crate::storage::{Storage, StorageResult};
use crate::url::{resolve_links, Category, Classifier};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    /// BFS distance from the seed
    pub depth: u32,
    pub category: Category,
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Enqueued,
    /// Classified with priority 0
    Rejected(Category),
    AlreadyKnown,
    AlreadyQueued,
    PreviouslyFailed,
    /// Already taken off the queue earlier in the run
    AlreadyProcessed,
    /// The optional queue-size guard is reached
    QueueFull,
}

/// Result of recording one fetched page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// The page itself was newly added to the store
    pub recorded: bool,
    /// Number of outbound links that entered the queue
    pub enqueued: usize,
}

/// Totals for one drain of the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub dequeued: usize,
    /// Newly recorded URLs
    pub discovered: usize,
    /// Dequeued URLs skipped because the store already knew them
    pub skipped: usize,
    pub failed: usize,
    /// The deadline stopped the drain with work left in the queue
    pub stopped_early: bool,
}

/// Scheduler manages the frontier queue
///
/// Lifecycle per URL: `unseen → queued → in-flight → (known | failed)`.
/// The queue is strict FIFO, so children are fetched after every URL that
/// was queued before them.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// FIFO queue of URLs to fetch
    queue: VecDeque<FrontierEntry>,

    /// URLs queued or in flight
    queued: HashSet<String>,

    /// URL currently being fetched
    in_flight: Option<String>,

    /// URLs whose processing finished this run, whether or not the store took them
    processed: HashSet<String>,

    /// Failed URLs in failure order
    failed: Vec<String>,
    failed_set: HashSet<String>,

    /// Optional cap on queue length
    max_queue_size: Option<usize>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_queue_size` - Optional guard; offers are refused once the queue holds this many entries
    pub fn new(max_queue_size: Option<usize>) -> Self {
        Self {
            max_queue_size,
            ..Default::default()
        }
    }

    /// Classifies a URL and enqueues it if it passes every precondition
    ///
    /// A URL is enqueued only if its priority is above 0, it is not known to
    /// the store, not already queued, and was not processed or failed earlier
    /// in the run. The processed check holds even when the store refused to
    /// record the URL, so a failing store cannot make pages loop.
    pub fn offer(
        &mut self,
        url: &str,
        depth: u32,
        classifier: &Classifier,
        storage: &dyn Storage,
    ) -> Offer {
        let classification = classifier.classify(url);
        if !classification.should_enqueue() {
            tracing::trace!("Rejected {} ({})", url, classification.category);
            return Offer::Rejected(classification.category);
        }

        if self.queued.contains(url) {
            return Offer::AlreadyQueued;
        }

        if self.failed_set.contains(url) {
            return Offer::PreviouslyFailed;
        }

        if self.processed.contains(url) {
            return Offer::AlreadyProcessed;
        }

        match storage.is_known(url) {
            Ok(true) => return Offer::AlreadyKnown,
            Ok(false) => {}
            // Dequeue re-checks the store, so an unknown answer here is safe
            Err(e) => tracing::warn!("Store lookup failed for {}: {}", url, e),
        }

        self.push(FrontierEntry {
            url: url.to_string(),
            depth,
            category: classification.category,
        })
    }

    /// Adds an entry to the back of the queue
    pub fn push(&mut self, entry: FrontierEntry) -> Offer {
        if self.queued.contains(&entry.url) {
            return Offer::AlreadyQueued;
        }

        if let Some(max) = self.max_queue_size {
            if self.queue.len() >= max {
                tracing::debug!("Queue full ({}), dropping {}", max, entry.url);
                return Offer::QueueFull;
            }
        }

        tracing::debug!("Queued [D{}] {}: {}", entry.depth, entry.category, entry.url);
        self.queued.insert(entry.url.clone());
        self.queue.push_back(entry);
        Offer::Enqueued
    }

    /// Pops the next entry and marks it in flight
    pub fn next_entry(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.in_flight = Some(entry.url.clone());
        Some(entry)
    }

    /// Finishes a URL's processing and releases it from the queued set
    pub fn complete(&mut self, url: &str) {
        self.queued.remove(url);
        self.processed.insert(url.to_string());
        if self.in_flight.as_deref() == Some(url) {
            self.in_flight = None;
        }
    }

    /// Records a fetch failure; the URL is never queued again in this run
    pub fn record_failure(&mut self, url: &str) {
        self.complete(url);
        if self.failed_set.insert(url.to_string()) {
            self.failed.push(url.to_string());
        }
    }

    /// Reports where a URL is in its lifecycle
    pub fn url_state(&self, url: &str, storage: &dyn Storage) -> StorageResult<UrlState> {
        if self.in_flight.as_deref() == Some(url) {
            return Ok(UrlState::InFlight);
        }
        if self.queued.contains(url) {
            return Ok(UrlState::Queued);
        }
        if self.failed_set.contains(url) {
            return Ok(UrlState::Failed);
        }
        if storage.is_known(url)? {
            return Ok(UrlState::Known);
        }
        Ok(UrlState::Unseen)
    }

    /// Returns the number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Failed URLs in the order they failed
    pub fn failed_urls(&self) -> &[String] {
        &self.failed
    }

    /// Records a successfully fetched page and offers its outbound links
    ///
    /// The page is added to the store under `phase`, its artifact is saved,
    /// and every resolved link that passes `offer` is queued at `depth + 1`.
    /// Store failures are logged and do not stop link processing.
    pub fn absorb(
        &mut self,
        ctx: &DiscoveryContext,
        entry: &FrontierEntry,
        phase: Phase,
        response: &FetchResponse,
    ) -> PageOutcome {
        let storage = ctx.storage();
        let mut outcome = PageOutcome::default();

        match storage.add_url(&entry.url, entry.category, phase, entry.depth) {
            Ok(added) => outcome.recorded = added,
            Err(e) => tracing::warn!("Failed to record {}: {}", entry.url, e),
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

        for link in resolve_links(&response.links, ctx.base_url()) {
            if self.offer(&link, entry.depth + 1, ctx.classifier(), storage) == Offer::Enqueued {
                outcome.enqueued += 1;
            }
        }

        self.complete(&entry.url);
        outcome
    }

    /// Drains the queue until it is empty or the deadline passes
    ///
    /// One fetch is in flight at a time, with the configured request delay
    /// between fetches. A fetch that has started always runs to completion.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The discovery context
    /// * `headers` - Request headers for the run
    /// * `deadline` - Optional instant after which no new fetch is started
    pub async fn drain(
        &mut self,
        ctx: &DiscoveryContext,
        headers: &RequestHeaders,
        deadline: Option<Instant>,
    ) -> DrainSummary {
        let mut summary = DrainSummary::default();
        let delay = ctx.config().crawler.request_delay();
        let start_time = Instant::now();

        while !self.is_empty() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(
                    "Runtime limit reached with {} URLs still queued",
                    self.len()
                );
                summary.stopped_early = true;
                break;
            }

            let Some(entry) = self.next_entry() else {
                break;
            };
            summary.dequeued += 1;

            match ctx.storage().is_known(&entry.url) {
                Ok(true) => {
                    tracing::debug!("Skipping already discovered {}", entry.url);
                    summary.skipped += 1;
                    self.complete(&entry.url);
                    continue;
                }
                Ok(false) => {}
                Err(e) => tracing::warn!("Store lookup failed for {}: {}", entry.url, e),
            }

            tracing::debug!("Crawling [D{}] {}: {}", entry.depth, entry.category, entry.url);

            match ctx.fetcher().fetch(&entry.url, headers).await {
                Ok(response) => {
                    let outcome = self.absorb(ctx, &entry, Phase::Recursive, &response);
                    if outcome.recorded {
                        summary.discovered += 1;
                    }
                    tracing::debug!(
                        "{} yielded {} new queue entries",
                        entry.url,
                        outcome.enqueued
                    );
                }
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", entry.url, e);
                    self.record_failure(&entry.url);
                    summary.failed += 1;
                }
            }

            if summary.dequeued % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = summary.dequeued as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} URLs processed, {} discovered, {} in queue, {:.2} URLs/sec",
                    summary.dequeued,
                    summary.discovered,
                    self.len(),
                    rate
                );
            }

            if !self.is_empty() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        summary
    }
}
