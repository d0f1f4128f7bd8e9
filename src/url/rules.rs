//! Static classification rule table
//!
//! Rules are evaluated in declaration order and the first match wins:
//! exclude, then file download, then named high-priority content, then
//! medium priority. Every pattern is case-insensitive and searched anywhere
//! in the full URL string.

use crate::url::Category;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("built-in classification pattern is valid")
}

/// Never followed
static EXCLUDE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^tel:",
        r"^mailto:",
        r"^#",
        r"/user/logout",
        r"utm_source=",
        r"facebook\.com|twitter\.com|instagram\.com|linkedin\.com",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

/// Downloadable resources
static FILE_DOWNLOAD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\.(pdf|doc|docx|ppt|pptx|xls|xlsx)$",
        r"\.(zip|rar|tar|gz)$",
        r"\.(mp4|mp3|avi|mov|wmv)$",
        r"/download/",
        r"/materials/",
        r"/recursos/",
        r"/arquivos/",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

/// Named content sections
static HIGH_PRIORITY_PATTERNS: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
    [
        (r"/ead(/.*)?$", Category::Education),
        (r"/conteudos(/.*)?$", Category::Content),
        (r"/educacao-a-distancia(/.*)?$", Category::HighPriority),
        (r"/servicos(/.*)?$", Category::Services),
        (r"/eventos(/.*)?$", Category::Events),
        (r"/pwa/produtos(/.*)?$", Category::Products),
        (r"/podcast(/.*)?$", Category::Podcast),
        (r"/receitas(/.*)?$", Category::Recipes),
        (r"/calculadoras(/.*)?$", Category::Calculators),
        (r"/acervo(/.*)?$", Category::Archive),
    ]
    .iter()
    .map(|(p, category)| (compile(p), *category))
    .collect()
});

/// Institutional and account pages
static MEDIUM_PRIORITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/sobre-nos",
        r"/perguntas-frequentes",
        r"/cadastro",
        r"/meus-cursos",
        r"/meus-certificados",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

pub fn is_excluded(url: &str) -> bool {
    EXCLUDE_PATTERNS.iter().any(|re| re.is_match(url))
}

pub fn is_file_download(url: &str) -> bool {
    FILE_DOWNLOAD_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Returns the category of the first matching high-priority rule
pub fn high_priority_category(url: &str) -> Option<Category> {
    HIGH_PRIORITY_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(url))
        .map(|(_, category)| *category)
}

pub fn is_medium_priority(url: &str) -> bool {
    MEDIUM_PRIORITY_PATTERNS.iter().any(|re| re.is_match(url))
}
