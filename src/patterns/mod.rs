//! Pattern Analyzer
//!
//! Detects numeric-ID URL templates among discovered URLs and proposes
//! untested IDs around the observed ones. The output is a heuristic:
//! candidates that do not correspond to real content are filtered later
//! by fetch validation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use url::{Position, Url};

/// Minimum number of same-shaped URLs before a template is trusted
pub const MIN_EXAMPLES: usize = 3;

/// IDs proposed below the smallest observed ID
const RANGE_BELOW: u64 = 10;

/// IDs proposed above the smallest observed ID (exclusive)
const RANGE_ABOVE: u64 = 50;

/// Known path shapes, each with exactly one captured numeric segment
static PATH_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/ead/[^/]+/[^/]+-(\d+)",
        r"/conteudos/[^/]+/[^/]+-(\d+)",
        r"/node/(\d+)",
        r"/produtos/[^/]+-(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("built-in path shape is valid"))
    .collect()
});

/// A URL path shape with one numeric placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    /// Path shape the examples matched
    pub shape: String,
    /// Path with the numeric segment replaced by `{id}`
    pub template: String,
    /// Absolute URL with the numeric segment replaced by `{id}`
    pub url_template: String,
    pub observed_ids: BTreeSet<u64>,
    /// URLs that matched the shape, in input order
    pub examples: Vec<String>,
    /// Candidate URLs in ascending ID order
    pub candidates: Vec<String>,
}

impl PatternTemplate {
    /// Substitutes an ID into the URL template
    pub fn url_for(&self, id: u64) -> String {
        self.url_template.replacen("{id}", &id.to_string(), 1)
    }

    /// Returns the half-open candidate ID range derived from the observed IDs
    ///
    /// `start = max(1, min - 10)`, `end = min + 50`. Empty when there are no
    /// observed IDs or when `min + 50` does not fit in a `u64`.
    pub fn candidate_range(&self) -> std::ops::Range<u64> {
        let Some(&min) = self.observed_ids.iter().next() else {
            return 0..0;
        };

        match min.checked_add(RANGE_ABOVE) {
            Some(end) => min.saturating_sub(RANGE_BELOW).max(1)..end,
            None => 0..0,
        }
    }
}

/// One URL that matched a path shape
struct Example {
    url: String,
    prefix: String,
    path: String,
    suffix: String,
    id: u64,
    id_span: (usize, usize),
}

fn match_shape(shape: &Regex, url: &Url) -> Option<Example> {
    let path = url.path();
    let caps = shape.captures(path)?;
    let id_match = caps.get(1)?;
    let id = id_match.as_str().parse().ok()?;

    Some(Example {
        url: url.to_string(),
        prefix: url[..Position::BeforePath].to_string(),
        path: path.to_string(),
        suffix: url[Position::AfterPath..].to_string(),
        id,
        id_span: (id_match.start(), id_match.end()),
    })
}

/// Analyzes discovered URLs for numeric-ID templates
///
/// Each URL is matched against the known path shapes (first match wins) and
/// grouped by shape. Shapes with at least three examples produce a template
/// derived from the first example, plus one candidate URL per ID in
/// `[max(1, min - 10), min + 50)` that was not already observed.
///
/// # Arguments
///
/// * `urls` - Discovered URLs, usually every record in the store
///
/// # Returns
///
/// Templates keyed by path template (e.g. `/ead/curso/item-{id}`)
///
/// # Examples
///
/// ```
/// use deep_mapsite::patterns::analyze_patterns;
///
/// let urls = [
///     "https://example.com/ead/curso/item-10",
///     "https://example.com/ead/curso/item-12",
///     "https://example.com/ead/curso/item-15",
/// ];
/// let templates = analyze_patterns(&urls);
/// let template = &templates["/ead/curso/item-{id}"];
/// assert_eq!(template.candidates.len(), 56);
/// ```
pub fn analyze_patterns<S: AsRef<str>>(urls: &[S]) -> BTreeMap<String, PatternTemplate> {
    let mut groups: Vec<Vec<Example>> = PATH_SHAPES.iter().map(|_| Vec::new()).collect();

    for raw in urls {
        let Ok(url) = Url::parse(raw.as_ref()) else {
            continue;
        };

        for (index, shape) in PATH_SHAPES.iter().enumerate() {
            if let Some(example) = match_shape(shape, &url) {
                groups[index].push(example);
                break;
            }
        }
    }

    let mut templates = BTreeMap::new();

    for (shape, examples) in PATH_SHAPES.iter().zip(groups) {
        if examples.len() < MIN_EXAMPLES {
            continue;
        }

        let first = &examples[0];
        let (start, end) = first.id_span;
        let template = format!("{}{{id}}{}", &first.path[..start], &first.path[end..]);
        let url_template = format!("{}{}{}", first.prefix, template, first.suffix);

        let mut pattern = PatternTemplate {
            shape: shape.as_str().to_string(),
            template: template.clone(),
            url_template,
            observed_ids: examples.iter().map(|e| e.id).collect(),
            examples: examples.iter().map(|e| e.url.clone()).collect(),
            candidates: Vec::new(),
        };

        let range = pattern.candidate_range();
        if range.is_empty() {
            tracing::debug!("Pattern {} skipped: candidate IDs overflow u64", template);
            continue;
        }

        pattern.candidates = range
            .filter(|id| !pattern.observed_ids.contains(id))
            .map(|id| pattern.url_for(id))
            .collect();

        tracing::debug!(
            "Pattern {} ({} examples) proposes {} candidates",
            template,
            examples.len(),
            pattern.candidates.len()
        );

        templates.insert(template, pattern);
    }

    templates
}
