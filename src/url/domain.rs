use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the seed URL of a run
///
/// The seed must be an absolute http(s) URL with a host.
pub fn parse_seed_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use deep_mapsite::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a host belongs to the configured base domain
///
/// Same-domain means the host contains the base domain string, so
/// subdomains and country-suffixed variants of the site are included.
///
/// # Examples
///
/// ```
/// use deep_mapsite::url::is_same_domain;
///
/// assert!(is_same_domain("example.com", "example.com"));
/// assert!(is_same_domain("www.example.com", "example.com"));
/// assert!(!is_same_domain("example.org", "example.com"));
/// ```
pub fn is_same_domain(host: &str, base_domain: &str) -> bool {
    !base_domain.is_empty() && host.to_lowercase().contains(&base_domain.to_lowercase())
}
