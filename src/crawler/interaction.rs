//! Interaction collaborator
//!
//! Surfaces links a plain fetch misses: menu and expandable targets,
//! paginated listings, and search/filter results. The bundled
//! `HttpInteractor` drives these through plain GET requests; a
//! browser-backed implementation can be plugged in through the same trait.

use crate::crawler::fetcher::{apply_headers, is_html, FetchError, RequestHeaders};
use crate::crawler::parser::clean_href;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Runs interactive discovery on a single page
#[async_trait]
pub trait Interactor: Send + Sync {
    /// Returns every link visible after interacting with `url`
    ///
    /// Best-effort: callers treat an error as "no additional URLs".
    async fn interact(
        &self,
        url: &str,
        headers: &RequestHeaders,
        user_agent: &str,
    ) -> Result<Vec<String>, FetchError>;
}

/// Limits applied to one interaction session
#[derive(Debug, Clone)]
pub struct InteractionSettings {
    /// Maximum number of paginated pages followed from one start page
    pub max_pagination_clicks: usize,
    /// Queries submitted into each search form
    pub search_terms: Vec<String>,
}

/// What one page offers for interaction
#[derive(Debug, Default)]
struct PageScan {
    links: Vec<String>,
    pagination: Vec<String>,
    form_requests: Vec<String>,
}

/// HTTP-driven interactor
#[derive(Debug, Clone)]
pub struct HttpInteractor {
    client: Client,
    settings: InteractionSettings,
}

impl HttpInteractor {
    pub fn new(client: Client, settings: InteractionSettings) -> Self {
        Self { client, settings }
    }

    async fn load(
        &self,
        url: &str,
        headers: &RequestHeaders,
        user_agent: &str,
    ) -> Result<Option<String>, FetchError> {
        let mut headers = headers.clone();
        headers.insert("User-Agent".to_string(), user_agent.to_string());
        let request = apply_headers(self.client.get(url), &headers);

        let response = request.send().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
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
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl Interactor for HttpInteractor {
    async fn interact(
        &self,
        url: &str,
        headers: &RequestHeaders,
        user_agent: &str,
    ) -> Result<Vec<String>, FetchError> {
        let start = Url::parse(url).map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let Some(body) = self.load(url, headers, user_agent).await? else {
            return Ok(Vec::new());
        };
        let scan = scan_page(&body, &start, &self.settings.search_terms);

        let mut collector = LinkCollector::default();
        collector.extend(scan.links);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start.to_string());

        // Pagination: breadth-first over "next" controls, capped and cycle-safe
        let mut pages: VecDeque<String> = scan.pagination.into_iter().collect();
        let mut clicks = 0;
        while let Some(next) = pages.pop_front() {
            if clicks >= self.settings.max_pagination_clicks {
                tracing::debug!("Pagination cap reached on {}", url);
                break;
            }
            if !visited.insert(next.clone()) {
                continue;
            }
            clicks += 1;

            match self.load(&next, headers, user_agent).await {
                Ok(Some(body)) => {
                    if let Ok(page_url) = Url::parse(&next) {
                        let sub = scan_page(&body, &page_url, &[]);
                        collector.extend(sub.links);
                        pages.extend(sub.pagination);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping pagination page {}: {}", next, e),
            }
        }

        // Search and filter submissions
        for request in scan.form_requests {
            if !visited.insert(request.clone()) {
                continue;
            }

            match self.load(&request, headers, user_agent).await {
                Ok(Some(body)) => {
                    if let Ok(page_url) = Url::parse(&request) {
                        collector.extend(scan_page(&body, &page_url, &[]).links);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping form result {}: {}", request, e),
            }
        }

        tracing::debug!(
            "Interaction on {} followed {} pages, found {} links",
            url,
            visited.len(),
            collector.links.len()
        );

        Ok(collector.links)
    }
}

/// Ordered, deduplicating link accumulator
#[derive(Default)]
struct LinkCollector {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl LinkCollector {
    fn extend(&mut self, links: impl IntoIterator<Item = String>) {
        for link in links {
            if self.seen.insert(link.clone()) {
                self.links.push(link);
            }
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn resolve(page_url: &Url, href: &str) -> Option<String> {
    let href = clean_href(href)?;
    if href.starts_with('#') {
        return None;
    }
    page_url.join(&href).ok().map(|u| u.to_string())
}

/// Scans a page for links, pagination targets, and form submissions
///
/// Runs synchronously so the parsed document never lives across an await.
fn scan_page(html: &str, page_url: &Url, search_terms: &[String]) -> PageScan {
    let document = Html::parse_document(html);
    let mut scan = PageScan::default();

    if let Some(sel) = selector("a[href]") {
        for element in document.select(&sel) {
            if let Some(link) = element.value().attr("href").and_then(|h| resolve(page_url, h)) {
                scan.links.push(link);
            }
        }
    }

    // Menus and expandable widgets often carry their target in data attributes
    if let Some(sel) = selector("[data-href], [data-url]") {
        for element in document.select(&sel) {
            let target = element
                .value()
                .attr("data-href")
                .or_else(|| element.value().attr("data-url"));
            if let Some(link) = target.and_then(|h| resolve(page_url, h)) {
                scan.links.push(link);
            }
        }
    }

    if let Some(sel) = selector("a[rel~='next'][href], .pagination a[href], .pager a[href], a.next[href]") {
        for element in document.select(&sel) {
            if let Some(link) = element.value().attr("href").and_then(|h| resolve(page_url, h)) {
                if !scan.pagination.contains(&link) {
                    scan.pagination.push(link);
                }
            }
        }
    }

    if !search_terms.is_empty() {
        if let Some(sel) = selector("form") {
            for form in document.select(&sel) {
                scan.form_requests
                    .extend(form_requests(&form, page_url, search_terms));
            }
        }
    }

    scan
}

/// Builds the GET URLs a form would submit
///
/// Search forms are submitted once per search term; filter forms once with
/// each `select` set to its first non-empty option.
fn form_requests(form: &ElementRef<'_>, page_url: &Url, search_terms: &[String]) -> Vec<String> {
    let method = form.value().attr("method").unwrap_or("get");
    if !method.eq_ignore_ascii_case("get") {
        return Vec::new();
    }

    let action = form.value().attr("action").unwrap_or("").trim();
    let Ok(target) = page_url.join(action) else {
        return Vec::new();
    };

    let hidden: Vec<(String, String)> = selector("input[type='hidden'][name]")
        .map(|sel| {
            form.select(&sel)
                .filter_map(|input| {
                    let name = input.value().attr("name")?;
                    let value = input.value().attr("value").unwrap_or("");
                    Some((name.to_string(), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let build = |pairs: &[(String, String)]| {
        let mut url = target.clone();
        url.set_fragment(None);
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (name, value) in hidden.iter().chain(pairs.iter()) {
                query.append_pair(name, value);
            }
        }
        url.to_string()
    };

    let mut requests = Vec::new();

    let search_input = selector("input[type='search'][name], input[name*='search']")
        .and_then(|sel| form.select(&sel).next())
        .and_then(|input| input.value().attr("name"));

    if let Some(name) = search_input {
        for term in search_terms {
            requests.push(build(&[(name.to_string(), term.clone())]));
        }
        return requests;
    }

    let filters: Vec<(String, String)> = selector("select[name]")
        .map(|sel| {
            form.select(&sel)
                .filter_map(|select| {
                    let name = select.value().attr("name")?;
                    let option_sel = selector("option[value]")?;
                    let value = select
                        .select(&option_sel)
                        .filter_map(|option| option.value().attr("value"))
                        .find(|value| !value.trim().is_empty())?;
                    Some((name.to_string(), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    if !filters.is_empty() {
        requests.push(build(&filters));
    }

    requests
}
