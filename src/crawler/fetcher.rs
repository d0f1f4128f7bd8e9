//! Fetch collaborator
//!
//! This module defines the page-fetch contract the discovery engine relies on
//! and a reqwest-backed implementation of it:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests carrying the run's credential headers
//! - Content-Type gating (non-HTML bodies are not read)
//! - Error classification into `FetchError`

use crate::crawler::parser::parse_html;
use crate::storage::ArtifactContent;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Request headers sent with every fetch of a run
pub type RequestHeaders = BTreeMap<String, String>;

/// Errors raised by the fetch and interaction collaborators
///
/// The engine does not interpret the cause; every variant is a fetch failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Result of a successful fetch
///
/// Every content field is optional; a collaborator fills in what it has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub title: Option<String>,
    /// Outbound links as found on the page (may be relative)
    pub links: Vec<String>,
    pub markdown: Option<String>,
    pub html: Option<String>,
}

impl FetchResponse {
    /// Length in characters of the extracted text, 0 when absent
    pub fn content_length(&self) -> usize {
        self.markdown
            .as_deref()
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    /// Converts the response into the persisted artifact form
    pub fn to_artifact(&self) -> ArtifactContent {
        ArtifactContent {
            title: self.title.clone(),
            markdown: self.markdown.clone(),
            html: self.html.clone(),
            links: self.links.clone(),
        }
    }
}

/// Fetches a single page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` with the given request headers
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - The page was retrieved
    /// * `Err(FetchError)` - Any non-success outcome
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<FetchResponse, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - User agent string presented to the site
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use deep_mapsite::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Mozilla/5.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Applies the run's headers to a request builder
pub(crate) fn apply_headers(
    mut request: reqwest::RequestBuilder,
    headers: &RequestHeaders,
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

/// Returns true if the Content-Type denotes an HTML document
pub(crate) fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml")
        }
        // Servers that omit the header are usually serving HTML
        None => true,
    }
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, timeout)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<FetchResponse, FetchError> {
        let request = apply_headers(self.client.get(url), headers);

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if !is_html(content_type.as_deref()) {
            tracing::debug!(
                "Not parsing {} ({})",
                url,
                content_type.as_deref().unwrap_or("unknown")
            );
            return Ok(FetchResponse {
                url: final_url,
                status_code: status.as_u16(),
                content_type,
                ..Default::default()
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let parsed = parse_html(&body);

        Ok(FetchResponse {
            url: final_url,
            status_code: status.as_u16(),
            content_type,
            title: parsed.title,
            links: parsed.links,
            markdown: Some(parsed.markdown),
            html: Some(body),
        })
    }
}
