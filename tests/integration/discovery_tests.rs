//! Integration tests for multi-phase discovery
//!
//! These tests drive the full coordinator with in-memory fetch, interaction,
//! and credentials collaborators and check the resulting store contents.

use async_trait::async_trait;
use deep_mapsite::config::{parse_config, Config};
use deep_mapsite::crawler::{
    Coordinator, DiscoveryContext, FetchError, FetchResponse, Interactor, PageFetcher,
    RequestHeaders, Scheduler, StaticCredentials,
};
use deep_mapsite::storage::{
    ArtifactContent, DiscoveredUrl, ScrapedArtifact, SqliteStorage, Storage, StorageError,
    StorageResult, StoreStats,
};
use deep_mapsite::{Category, MapsiteError, Phase};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SEED: &str = "https://example.com/";

/// Serves canned pages; any other URL is a 404
#[derive(Default)]
struct MockFetcher {
    pages: HashMap<String, FetchResponse>,
    calls: Mutex<Vec<(String, RequestHeaders)>>,
    /// Time every fetch takes
    latency: Option<Duration>,
}

impl MockFetcher {
    fn page(mut self, url: &str, links: &[&str], text: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                url: url.to_string(),
                status_code: 200,
                content_type: Some("text/html".to_string()),
                title: Some(url.to_string()),
                links: links.iter().map(|l| l.to_string()).collect(),
                markdown: Some(text.to_string()),
                html: None,
            },
        );
        self
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    fn fetch_count(&self, url: &str) -> usize {
        self.fetched().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<FetchResponse, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), headers.clone()));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Returns canned post-interaction links per URL
#[derive(Default)]
struct MockInteractor {
    links: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockInteractor {
    fn reveals(mut self, url: &str, links: &[&str]) -> Self {
        self.links
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    fn interacted(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Interactor for MockInteractor {
    async fn interact(
        &self,
        url: &str,
        _headers: &RequestHeaders,
        user_agent: &str,
    ) -> Result<Vec<String>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), user_agent.to_string()));

        Ok(self.links.get(url).cloned().unwrap_or_default())
    }
}

/// Store that answers reads with "unknown" and refuses every write
struct RejectingStorage;

impl Storage for RejectingStorage {
    fn add_url(&self, _: &str, _: Category, _: Phase, _: u32) -> StorageResult<bool> {
        Err(StorageError::Database("database is locked".to_string()))
    }

    fn is_known(&self, _: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn get_url(&self, _: &str) -> StorageResult<Option<DiscoveredUrl>> {
        Ok(None)
    }

    fn all_urls(&self) -> StorageResult<Vec<DiscoveredUrl>> {
        Ok(Vec::new())
    }

    fn save_artifact(
        &self,
        _: &str,
        _: &ArtifactContent,
        _: Phase,
        _: u32,
        _: Category,
    ) -> StorageResult<bool> {
        Err(StorageError::Database("database is locked".to_string()))
    }

    fn get_artifact(&self, _: &str) -> StorageResult<Option<ScrapedArtifact>> {
        Ok(None)
    }

    fn count_artifacts(&self) -> StorageResult<u64> {
        Ok(0)
    }

    fn stats(&self) -> StorageResult<StoreStats> {
        Ok(StoreStats::default())
    }

    fn clear(&self) -> StorageResult<()> {
        Ok(())
    }
}

fn test_config(extra: &str) -> Config {
    let toml = format!(
        r#"
[site]
base-url = "{SEED}"
user-agent = "TestAgent/1.0"

[crawler]
request-delay-ms = 0
pattern-delay-ms = 0
interaction-delay-ms = 0
{extra}

[output]
database-path = "unused.db"
"#
    );
    parse_config(&toml).expect("test config is valid")
}

fn coordinator(
    config: Config,
    storage: &Arc<SqliteStorage>,
    fetcher: &Arc<MockFetcher>,
    interactor: &Arc<MockInteractor>,
) -> Coordinator {
    let credentials = Arc::new(StaticCredentials::new(
        config.auth.clone(),
        config.site.user_agent.clone(),
    ));
    let ctx = DiscoveryContext::new(
        config,
        storage.clone(),
        fetcher.clone(),
        interactor.clone(),
        credentials,
    )
    .expect("context builds");
    Coordinator::new(ctx)
}

fn url(path: &str) -> String {
    format!("https://example.com{}", path)
}

#[tokio::test]
async fn test_seed_links_classified_and_queued() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a", "/b", "http://other.com/c", "tel:123"], "home")
            .page(&url("/a"), &[], "page a")
            .page(&url("/b"), &[], "page b"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let mut coordinator = coordinator(test_config(""), &storage, &fetcher, &interactor);
    let report = coordinator.run().await.unwrap();

    let records = storage.all_urls().unwrap();
    let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![SEED, url("/a").as_str(), url("/b").as_str()]);

    let seed = storage.get_url(SEED).unwrap().unwrap();
    assert_eq!(seed.category, Category::Homepage);
    assert_eq!(seed.phase, Phase::Foundation);
    assert_eq!(seed.depth, 0);

    for path in ["/a", "/b"] {
        let record = storage.get_url(&url(path)).unwrap().unwrap();
        assert_eq!(record.depth, 1);
        assert_eq!(record.phase, Phase::Recursive);
        assert_eq!(record.category, Category::General);
    }

    // External and tel: links are never fetched
    assert_eq!(fetcher.fetched(), vec![SEED.to_string(), url("/a"), url("/b")]);

    assert_eq!(report.phase(Phase::Foundation).unwrap().discovered, 1);
    assert_eq!(report.phase(Phase::Recursive).unwrap().discovered, 2);
    assert_eq!(report.stats.total_urls, 3);
    assert!(report.failed_urls.is_empty());
    assert!(!report.stopped_early);
    assert_eq!(report.phases.len(), 4);
}

#[tokio::test]
async fn test_artifacts_saved_for_fetched_pages() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/receitas/bolo"], "home")
            .page(&url("/receitas/bolo"), &[], "Bolo de cenoura"),
    );
    let interactor = Arc::new(MockInteractor::default());

    coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    let seed_artifact = storage.get_artifact(SEED).unwrap().unwrap();
    assert_eq!(seed_artifact.category, Category::Homepage);
    assert_eq!(seed_artifact.content.links, vec!["/receitas/bolo".to_string()]);

    let artifact = storage.get_artifact(&url("/receitas/bolo")).unwrap().unwrap();
    assert_eq!(artifact.category, Category::Recipes);
    assert_eq!(artifact.depth, 1);
    assert_eq!(artifact.content.markdown.as_deref(), Some("Bolo de cenoura"));
    assert_eq!(storage.count_artifacts().unwrap(), 2);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/", "/a", "/b", "/a"], "home")
            .page(&url("/a"), &["/b", "/", "/c"], "a")
            .page(&url("/b"), &["/a", "/c"], "b")
            .page(&url("/c"), &["/a", "/b"], "c"),
    );
    let interactor = Arc::new(MockInteractor::default());

    coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    for target in [SEED.to_string(), url("/a"), url("/b"), url("/c")] {
        assert_eq!(fetcher.fetch_count(&target), 1, "{} fetched more than once", target);
    }

    assert_eq!(storage.get_url(&url("/c")).unwrap().unwrap().depth, 2);
    assert_eq!(storage.stats().unwrap().total_urls, 4);
}

#[tokio::test]
async fn test_failed_urls_reported_not_recorded() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a", "/broken"], "home")
            .page(&url("/a"), &["/broken"], "a"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    assert_eq!(report.failed_urls, vec![url("/broken")]);
    assert!(!storage.is_known(&url("/broken")).unwrap());
    assert_eq!(fetcher.fetch_count(&url("/broken")), 1);
    assert_eq!(report.stats.total_urls, 2);
}

#[tokio::test]
async fn test_seed_fetch_failure_aborts_run() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(MockFetcher::default());
    let interactor = Arc::new(MockInteractor::default());

    let result = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await;

    assert!(matches!(result, Err(MapsiteError::SeedFailure { .. })));
    assert_eq!(storage.stats().unwrap().total_urls, 0);
    assert!(interactor.interacted().is_empty());
}

#[tokio::test]
async fn test_seed_without_links_aborts_run() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(MockFetcher::default().page(SEED, &[], "empty home"));
    let interactor = Arc::new(MockInteractor::default());

    let result = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await;

    match result {
        Err(MapsiteError::SeedFailure { url, .. }) => assert_eq!(url, SEED),
        other => panic!("expected seed failure, got {:?}", other.map(|r| r.stats)),
    }
    assert_eq!(fetcher.fetched(), vec![SEED.to_string()]);
}

#[tokio::test]
async fn test_interaction_links_merged_idempotently() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a"], "home")
            .page(&url("/a"), &[], "a"),
    );
    let interactor = Arc::new(
        MockInteractor::default()
            .reveals(SEED, &["/receitas/bolo", "http://other.com/x", "/a", "mailto:x@example.com"])
            .reveals(&url("/a"), &["/receitas/bolo"]),
    );

    let report = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    let revealed = storage.get_url(&url("/receitas/bolo")).unwrap().unwrap();
    assert_eq!(revealed.phase, Phase::Interactive);
    assert_eq!(revealed.category, Category::Recipes);
    assert_eq!(revealed.depth, 1);

    // Already-known URLs keep their first record
    assert_eq!(storage.get_url(&url("/a")).unwrap().unwrap().phase, Phase::Recursive);

    assert_eq!(report.phase(Phase::Interactive).unwrap().discovered, 1);
    assert_eq!(report.stats.total_urls, 3);
    assert!(!storage.is_known("http://other.com/x").unwrap());

    let calls = interactor.calls.lock().unwrap();
    assert!(calls.iter().all(|(_, ua)| ua == "TestAgent/1.0"));
}

#[tokio::test]
async fn test_interaction_samples_per_category() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a", "/b", "/c", "/doc.pdf"], "home")
            .page(&url("/a"), &[], "a")
            .page(&url("/b"), &[], "b")
            .page(&url("/c"), &[], "c")
            .page(&url("/doc.pdf"), &[], ""),
    );
    let interactor = Arc::new(MockInteractor::default());

    coordinator(
        test_config("samples-per-category = 2"),
        &storage,
        &fetcher,
        &interactor,
    )
    .run()
    .await
    .unwrap();

    // One homepage plus the first two general pages; downloads are not sampled
    assert_eq!(
        interactor.interacted(),
        vec![SEED.to_string(), url("/a"), url("/b")]
    );
}

#[tokio::test]
async fn test_pattern_candidates_validated_by_content() {
    let long_text = "Conteúdo do curso ".repeat(10);
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(
                SEED,
                &["/ead/curso/item-10", "/ead/curso/item-12", "/ead/curso/item-15"],
                "home",
            )
            .page(&url("/ead/curso/item-10"), &[], &long_text)
            .page(&url("/ead/curso/item-12"), &[], &long_text)
            .page(&url("/ead/curso/item-15"), &[], &long_text)
            .page(&url("/ead/curso/item-20"), &["/ead/curso/extra"], &long_text)
            .page(&url("/ead/curso/item-21"), &[], "too short"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    let hit = storage.get_url(&url("/ead/curso/item-20")).unwrap().unwrap();
    assert_eq!(hit.phase, Phase::PatternCompletion);
    assert_eq!(hit.category, Category::Education);
    assert_eq!(hit.depth, 1);
    assert!(storage.get_artifact(&url("/ead/curso/item-20")).unwrap().is_some());

    let bonus = storage.get_url(&url("/ead/curso/extra")).unwrap().unwrap();
    assert_eq!(bonus.phase, Phase::PatternCompletion);
    assert_eq!(bonus.depth, 2);

    // Below-threshold and missing candidates are non-hits, not failures
    assert!(!storage.is_known(&url("/ead/curso/item-21")).unwrap());
    assert!(!storage.is_known(&url("/ead/curso/item-1")).unwrap());
    assert!(report.failed_urls.is_empty());

    // 56 candidates in [1, 60) minus the three observed IDs
    let candidate_fetches = fetcher
        .fetched()
        .iter()
        .filter(|u| u.starts_with(&url("/ead/curso/item-")))
        .count();
    assert_eq!(candidate_fetches, 3 + 56);
    assert_eq!(fetcher.fetch_count(&url("/ead/curso/item-10")), 1);

    assert_eq!(report.phase(Phase::PatternCompletion).unwrap().discovered, 2);
}

#[tokio::test]
async fn test_queue_size_guard_limits_frontier() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a", "/b", "/c"], "home")
            .page(&url("/a"), &[], "a")
            .page(&url("/b"), &[], "b")
            .page(&url("/c"), &[], "c"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(
        test_config("max-queue-size = 1"),
        &storage,
        &fetcher,
        &interactor,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.stats.total_urls, 2);
    assert!(storage.is_known(&url("/a")).unwrap());
    assert!(!storage.is_known(&url("/b")).unwrap());
}

#[tokio::test]
async fn test_credentials_sent_with_every_fetch() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a"], "home")
            .page(&url("/a"), &[], "a"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let mut config = test_config("");
    config.auth.cookie = Some("sid=abc".to_string());

    coordinator(config, &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    let calls = fetcher.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    for (_, headers) in calls.iter() {
        assert_eq!(headers.get("Cookie").map(String::as_str), Some("sid=abc"));
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some("TestAgent/1.0"));
    }
}

#[tokio::test]
async fn test_invalid_credentials_abort_before_fetching() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(MockFetcher::default().page(SEED, &["/a"], "home"));
    let interactor = Arc::new(MockInteractor::default());

    let mut config = test_config("");
    config.auth.username = Some("user".to_string());

    let result = coordinator(config, &storage, &fetcher, &interactor)
        .run()
        .await;

    assert!(matches!(result, Err(MapsiteError::Credentials(_))));
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn test_drain_terminates_when_queue_empties() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(&url("/1"), &[], "one")
            .page(&url("/2"), &[], "two")
            .page(&url("/3"), &[], "three"),
    );
    let interactor = Arc::new(MockInteractor::default());
    let coordinator = coordinator(test_config(""), &storage, &fetcher, &interactor);
    let ctx = coordinator.context();

    let mut scheduler = Scheduler::new(None);
    for path in ["/1", "/2", "/3"] {
        scheduler.offer(&url(path), 1, ctx.classifier(), ctx.storage());
    }

    let summary = scheduler.drain(ctx, &RequestHeaders::new(), None).await;

    assert_eq!(summary.dequeued, 3);
    assert_eq!(summary.discovered, 3);
    assert!(scheduler.is_empty());
    assert_eq!(storage.stats().unwrap().total_urls, 3);
}

#[tokio::test]
async fn test_drain_with_passed_deadline_fetches_nothing() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(&url("/1"), &[], "one")
            .page(&url("/2"), &[], "two"),
    );
    let interactor = Arc::new(MockInteractor::default());
    let coordinator = coordinator(test_config(""), &storage, &fetcher, &interactor);
    let ctx = coordinator.context();

    let mut scheduler = Scheduler::new(None);
    for path in ["/1", "/2"] {
        scheduler.offer(&url(path), 1, ctx.classifier(), ctx.storage());
    }

    let summary = scheduler
        .drain(ctx, &RequestHeaders::new(), Some(Instant::now()))
        .await;

    assert!(summary.stopped_early);
    assert_eq!(summary.dequeued, 0);
    assert_eq!(scheduler.len(), 2);
    assert!(fetcher.fetched().is_empty());
    assert_eq!(storage.stats().unwrap().total_urls, 0);
}

#[tokio::test]
async fn test_runtime_limit_skips_remaining_phases() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a"], "home")
            .page(&url("/a"), &[], "a")
            .with_latency(Duration::from_millis(1100)),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(
        test_config("max-runtime-secs = 1"),
        &storage,
        &fetcher,
        &interactor,
    )
    .run()
    .await
    .unwrap();

    assert!(report.stopped_early);
    assert_eq!(report.phases.len(), 1);
    assert_eq!(report.phases[0].phase, Phase::Foundation);
    assert_eq!(fetcher.fetched(), vec![SEED.to_string()]);
    assert!(interactor.interacted().is_empty());
    assert_eq!(report.stats.total_urls, 1);
}

#[tokio::test]
async fn test_unrepresentable_runtime_limit_means_no_limit() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a"], "home")
            .page(&url("/a"), &[], "a"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(
        test_config("max-runtime-secs = 9223372036854775807"),
        &storage,
        &fetcher,
        &interactor,
    )
    .run()
    .await
    .unwrap();

    assert!(!report.stopped_early);
    assert_eq!(report.phases.len(), 4);
    assert_eq!(report.stats.total_urls, 2);
}

#[tokio::test]
async fn test_drain_terminates_when_store_rejects_writes() {
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(&url("/a"), &["/b"], "a")
            .page(&url("/b"), &["/a"], "b"),
    );
    let config = test_config("");
    let credentials = Arc::new(StaticCredentials::new(
        config.auth.clone(),
        config.site.user_agent.clone(),
    ));
    let ctx = DiscoveryContext::new(
        config,
        Arc::new(RejectingStorage),
        fetcher.clone(),
        Arc::new(MockInteractor::default()),
        credentials,
    )
    .unwrap();

    let mut scheduler = Scheduler::new(None);
    scheduler.offer(&url("/a"), 1, ctx.classifier(), ctx.storage());

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        scheduler.drain(&ctx, &RequestHeaders::new(), None),
    )
    .await
    .expect("drain terminates");

    assert_eq!(summary.dequeued, 2);
    assert_eq!(summary.discovered, 0);
    assert!(scheduler.is_empty());
    assert_eq!(fetcher.fetch_count(&url("/a")), 1);
    assert_eq!(fetcher.fetch_count(&url("/b")), 1);
}

#[tokio::test]
async fn test_bare_origin_link_does_not_refetch_seed() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["https://example.com", "/a"], "home")
            .page(&url("/a"), &["https://example.com"], "a"),
    );
    let interactor = Arc::new(MockInteractor::default());

    let report = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    assert_eq!(fetcher.fetch_count(SEED), 1);
    assert!(!storage.is_known("https://example.com").unwrap());
    assert_eq!(report.stats.total_urls, 2);
    assert!(report.failed_urls.is_empty());
}

#[tokio::test]
async fn test_rerun_against_populated_store_finds_nothing_new() {
    let storage = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(SEED, &["/a"], "home")
            .page(&url("/a"), &["/b"], "a")
            .page(&url("/b"), &[], "b"),
    );
    let interactor = Arc::new(MockInteractor::default());

    coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();
    let second = coordinator(test_config(""), &storage, &fetcher, &interactor)
        .run()
        .await
        .unwrap();

    assert_eq!(second.stats.total_urls, 3);
    assert!(second.phases.iter().all(|p| p.discovered == 0));
}

#[test]
fn test_concurrent_add_url_records_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let storage = Arc::new(SqliteStorage::new(&dir.path().join("discovery.db")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let storage = storage.clone();
            std::thread::spawn(move || {
                storage
                    .add_url(&url("/shared"), Category::General, Phase::Recursive, 1)
                    .unwrap()
            })
        })
        .collect();

    let inserted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|added| *added)
        .count();

    assert_eq!(inserted, 1);
    assert_eq!(storage.stats().unwrap().total_urls, 1);
}
