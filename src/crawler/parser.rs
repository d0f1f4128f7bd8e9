//! HTML parser for extracting links, title, and readable text
//!
//! Links are returned as written in the page (trimmed `href` values);
//! resolution against the site base URL happens in the coordinator so that
//! every collaborator's links follow the same rules.

use scraper::{ElementRef, Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw link targets in document order
    pub links: Vec<String>,

    /// Markdown-flavoured plain text rendering of the body
    pub markdown: String,
}

/// Parses HTML content and extracts links, title, and text
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:` links and data URIs
///
/// `tel:`, `mailto:` and anchor links are kept; the classifier rejects them.
///
/// # Example
///
/// ```
/// use deep_mapsite::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
        markdown: extract_markdown(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all followable link targets from the HTML document
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href").and_then(clean_href) {
                links.push(href);
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href").and_then(clean_href) {
                links.push(href);
            }
        }
    }

    links
}

/// Trims an href and drops targets that can never be navigated to
pub(crate) fn clean_href(href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") {
        return None;
    }

    Some(href.to_string())
}

/// Renders headings, paragraphs, list items and cells as markdown-ish lines
fn extract_markdown(document: &Html) -> String {
    let Ok(block_selector) = Selector::parse("h1, h2, h3, h4, h5, h6, p, li, pre, blockquote, td, th")
    else {
        return String::new();
    };

    let mut lines = Vec::new();
    for element in document.select(&block_selector) {
        let text = collapse_whitespace(&element_text(&element));
        if text.is_empty() {
            continue;
        }

        let line = match element.value().name() {
            "h1" => format!("# {}", text),
            "h2" => format!("## {}", text),
            "h3" => format!("### {}", text),
            "h4" | "h5" | "h6" => format!("#### {}", text),
            "li" => format!("- {}", text),
            "blockquote" => format!("> {}", text),
            _ => text,
        };
        lines.push(line);
    }

    if lines.is_empty() {
        // Pages built from bare divs still carry text worth measuring
        if let Ok(body_selector) = Selector::parse("body") {
            if let Some(body) = document.select(&body_selector).next() {
                return collapse_whitespace(&element_text(&body));
            }
        }
    }

    lines.join("\n\n")
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
