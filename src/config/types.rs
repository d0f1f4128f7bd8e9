use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Deep-Mapsite
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Returns the domain string used for same-domain checks
    ///
    /// Falls back to the host of the base URL when no explicit
    /// base domain is configured.
    pub fn base_domain(&self) -> String {
        if let Some(domain) = &self.site.base_domain {
            return domain.to_lowercase();
        }

        url::Url::parse(&self.site.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default()
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Seed URL for foundation discovery
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Domain substring that marks a URL as same-domain
    #[serde(rename = "base-domain", default)]
    pub base_domain: Option<String>,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Credentials used to build the run's header set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// HTTP Basic username
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP Basic password
    #[serde(default)]
    pub password: Option<String>,

    /// Raw Cookie header carrying an already established session
    #[serde(default)]
    pub cookie: Option<String>,
}

/// Discovery behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause between recursive fetches (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Pause between pattern candidate validations (milliseconds)
    #[serde(rename = "pattern-delay-ms", default = "default_pattern_delay")]
    pub pattern_delay_ms: u64,

    /// Pause between interactive sessions (milliseconds)
    #[serde(rename = "interaction-delay-ms", default = "default_interaction_delay")]
    pub interaction_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Minimum extracted text length for a pattern candidate to count as a hit
    #[serde(rename = "min-content-length", default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Representative URLs per category for interactive discovery (0 = all)
    #[serde(rename = "samples-per-category", default = "default_samples_per_category")]
    pub samples_per_category: usize,

    /// Maximum pagination pages followed per interactive session
    #[serde(rename = "max-pagination-clicks", default = "default_max_pagination_clicks")]
    pub max_pagination_clicks: usize,

    /// Sample queries submitted into search controls
    #[serde(rename = "search-terms", default = "default_search_terms")]
    pub search_terms: Vec<String>,

    /// Optional cap on the number of queued URLs
    #[serde(rename = "max-queue-size", default)]
    pub max_queue_size: Option<usize>,

    /// Optional wall-clock limit for the whole run (seconds)
    #[serde(rename = "max-runtime-secs", default)]
    pub max_runtime_secs: Option<u64>,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn pattern_delay(&self) -> Duration {
        Duration::from_millis(self.pattern_delay_ms)
    }

    pub fn interaction_delay(&self) -> Duration {
        Duration::from_millis(self.interaction_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_runtime(&self) -> Option<Duration> {
        self.max_runtime_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay(),
            pattern_delay_ms: default_pattern_delay(),
            interaction_delay_ms: default_interaction_delay(),
            request_timeout_secs: default_request_timeout(),
            min_content_length: default_min_content_length(),
            samples_per_category: default_samples_per_category(),
            max_pagination_clicks: default_max_pagination_clicks(),
            search_terms: default_search_terms(),
            max_queue_size: None,
            max_runtime_secs: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the exported mapsite JSON document
    #[serde(rename = "mapsite-path", default = "default_mapsite_path")]
    pub mapsite_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Deep-Mapsite/1.0".to_string()
}

fn default_request_delay() -> u64 {
    1000
}

fn default_pattern_delay() -> u64 {
    500
}

fn default_interaction_delay() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_min_content_length() -> usize {
    100
}

fn default_samples_per_category() -> usize {
    10
}

fn default_max_pagination_clicks() -> usize {
    50
}

fn default_search_terms() -> Vec<String> {
    vec!["nutrição".to_string()]
}

fn default_mapsite_path() -> String {
    "./data/mapsite.json".to_string()
}

fn default_summary_path() -> String {
    "./data/summary.md".to_string()
}
