//! URL handling module for Deep-Mapsite
//!
//! This module provides the URL Classifier, same-domain checks, and
//! resolution of links returned by the fetch collaborator.

mod domain;
mod resolve;
mod rules;

use std::fmt;

// Re-export main functions
pub use domain::{extract_domain, is_same_domain, parse_seed_url};
pub use resolve::{resolve_link, resolve_links};

/// Category tag attached to every classified URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Not absolute or unparseable
    Invalid,
    /// Host outside the configured base domain
    External,
    /// Matched an exclude rule
    Excluded,
    /// Document, archive, media, or download directory
    FileDownloads,
    Education,
    Content,
    /// Named content section without a dedicated tag
    HighPriority,
    Services,
    Events,
    Products,
    Podcast,
    Recipes,
    Calculators,
    Archive,
    /// Institutional and account pages
    MediumPriority,
    /// The seed page
    Homepage,
    /// Any other same-domain URL
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::External => "external",
            Self::Excluded => "excluded",
            Self::FileDownloads => "file_downloads",
            Self::Education => "education",
            Self::Content => "content",
            Self::HighPriority => "high_priority",
            Self::Services => "services",
            Self::Events => "events",
            Self::Products => "products",
            Self::Podcast => "podcast",
            Self::Recipes => "recipes",
            Self::Calculators => "calculators",
            Self::Archive => "archive",
            Self::MediumPriority => "medium_priority",
            Self::Homepage => "homepage",
            Self::General => "general",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let category = match tag {
            "invalid" => Self::Invalid,
            "external" => Self::External,
            "excluded" => Self::Excluded,
            "file_downloads" => Self::FileDownloads,
            "education" => Self::Education,
            "content" => Self::Content,
            "high_priority" => Self::HighPriority,
            "services" => Self::Services,
            "events" => Self::Events,
            "products" => Self::Products,
            "podcast" => Self::Podcast,
            "recipes" => Self::Recipes,
            "calculators" => Self::Calculators,
            "archive" => Self::Archive,
            "medium_priority" => Self::MediumPriority,
            "homepage" => Self::Homepage,
            "general" => Self::General,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of classifying a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// 0 = do not enqueue, anything above = enqueue
    pub priority: u8,
}

impl Classification {
    const fn reject(category: Category) -> Self {
        Self {
            category,
            priority: 0,
        }
    }

    const fn accept(category: Category) -> Self {
        Self {
            category,
            priority: 1,
        }
    }

    /// Returns true if the URL should be queued
    pub fn should_enqueue(&self) -> bool {
        self.priority > 0
    }
}

/// URL Classifier
///
/// A pure function of the static rule table and the configured base domain.
/// Every same-domain URL that is not excluded is accepted at priority 1;
/// the priority value is kept as an extension point and does not order the
/// frontier.
#[derive(Debug, Clone)]
pub struct Classifier {
    base_domain: String,
}

impl Classifier {
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Classifies a URL
    ///
    /// # Rule Order (first match wins)
    ///
    /// 1. Not starting with `http` or unparseable → `invalid`, 0
    ///    (`excluded`, 0 when the link is a `tel:`/`mailto:`/anchor link)
    /// 2. Host not containing the base domain → `external`, 0
    /// 3. Exclude pattern → `excluded`, 0
    /// 4. File download pattern → `file_downloads`, 1
    /// 5. Named high-priority pattern → its category, 1
    /// 6. Medium-priority pattern → `medium_priority`, 1
    /// 7. Otherwise → `general`, 1
    ///
    /// # Examples
    ///
    /// ```
    /// use deep_mapsite::url::{Category, Classifier};
    ///
    /// let classifier = Classifier::new("example.com");
    ///
    /// let result = classifier.classify("https://example.com/receitas/bolo");
    /// assert_eq!(result.category, Category::Recipes);
    /// assert_eq!(result.priority, 1);
    ///
    /// let result = classifier.classify("https://other.org/receitas");
    /// assert_eq!(result.category, Category::External);
    /// assert_eq!(result.priority, 0);
    /// ```
    pub fn classify(&self, url: &str) -> Classification {
        if !url.starts_with("http") {
            // tel:, mailto: and anchor-only links are named by the exclude rules
            if rules::is_excluded(url) {
                return Classification::reject(Category::Excluded);
            }
            return Classification::reject(Category::Invalid);
        }

        let domain = match ::url::Url::parse(url).ok().as_ref().and_then(extract_domain) {
            Some(d) => d,
            None => return Classification::reject(Category::Invalid),
        };

        if !is_same_domain(&domain, &self.base_domain) {
            return Classification::reject(Category::External);
        }

        if rules::is_excluded(url) {
            return Classification::reject(Category::Excluded);
        }

        if rules::is_file_download(url) {
            return Classification::accept(Category::FileDownloads);
        }

        if let Some(category) = rules::high_priority_category(url) {
            return Classification::accept(category);
        }

        if rules::is_medium_priority(url) {
            return Classification::accept(Category::MediumPriority);
        }

        Classification::accept(Category::General)
    }
}
