use std::collections::HashSet;
use url::Url;

/// Resolves a link returned by the fetch collaborator against the site base URL
///
/// # Resolution Rules
///
/// - Empty links and parent-relative (`../`) links are dropped
/// - Absolute `http(s)` links are returned in serialized form, so
///   `https://example.com` and `https://example.com/` are the same URL
/// - Anchor-only links and links with any other scheme (`tel:`, `mailto:`)
///   are returned unchanged so the classifier can judge them
/// - `/path` links are joined to the base URL's origin
/// - Any other relative form is treated as relative to the site root
///
/// # Examples
///
/// ```
/// use deep_mapsite::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(resolve_link("/a", &base), Some("https://example.com/a".to_string()));
/// assert_eq!(resolve_link("tel:123", &base), Some("tel:123".to_string()));
/// assert_eq!(resolve_link("../up", &base), None);
/// ```
pub fn resolve_link(link: &str, base: &Url) -> Option<String> {
    let link = link.trim();

    if link.is_empty() || link.starts_with("../") {
        return None;
    }

    if link.starts_with('#') {
        return Some(link.to_string());
    }

    if let Ok(absolute) = Url::parse(link) {
        return match absolute.scheme() {
            "http" | "https" => Some(absolute.to_string()),
            _ => Some(link.to_string()),
        };
    }

    let joined = if link.starts_with('/') {
        base.join(link)
    } else {
        base.join(&format!("/{}", link))
    };

    joined.ok().map(|u| u.to_string())
}

/// Resolves a batch of links, collapsing duplicates while keeping first-seen order
pub fn resolve_links<S: AsRef<str>>(links: &[S], base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter_map(|link| resolve_link(link.as_ref(), base))
        .filter(|resolved| seen.insert(resolved.clone()))
        .collect()
}
