//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a discovery
//! run, including per-phase counts, the category breakdown, and failed URLs.

use crate::crawler::DiscoveryReport;
use crate::output::{ensure_parent, OutputResult};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
///
/// # Arguments
///
/// * `report` - The finished run's report
/// * `base_url` - The seed URL of the run
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    report: &DiscoveryReport,
    base_url: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, base_url);

    ensure_parent(output_path)?;
    fs::write(output_path, markdown)?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &DiscoveryReport, base_url: &str) -> String {
    let mut md = String::new();
    let stats = &report.stats;

    md.push_str("# Deep-Mapsite Discovery Summary\n\n");

    // Writing to a String cannot fail
    let _ = writeln!(md, "- **Site**: {}", base_url);
    let _ = writeln!(md, "- **Total URLs**: {}", stats.total_urls);
    if let Some(updated) = &stats.last_updated {
        let _ = writeln!(md, "- **Last Updated**: {}", updated);
    }
    let _ = writeln!(md, "- **Failed URLs**: {}", report.failed_urls.len());
    let _ = writeln!(
        md,
        "- **Duration**: {:.1} seconds",
        report.elapsed.as_secs_f64()
    );
    if report.stopped_early {
        md.push_str("- **Stopped early**: runtime limit reached\n");
    }
    md.push('\n');

    md.push_str("## Phases\n\n");
    md.push_str("| Phase | New URLs | Seconds |\n");
    md.push_str("|-------|----------|---------|\n");
    for phase in &report.phases {
        let _ = writeln!(
            md,
            "| {}. {} | {} | {:.1} |",
            phase.phase.number(),
            phase.phase,
            phase.discovered,
            phase.elapsed.as_secs_f64()
        );
    }
    md.push('\n');

    if !stats.by_category.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | URLs |\n");
        md.push_str("|----------|------|\n");

        let mut categories: Vec<_> = stats.by_category.iter().collect();
        categories.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (category, count) in categories {
            let _ = writeln!(md, "| {} | {} |", category, count);
        }
        md.push('\n');
    }

    if !stats.by_phase.is_empty() {
        md.push_str("## URLs by Discovering Phase\n\n");
        for (phase, count) in &stats.by_phase {
            let _ = writeln!(md, "- {}: {}", phase, count);
        }
        md.push('\n');
    }

    if !report.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        for url in report.failed_urls.iter().take(50) {
            let _ = writeln!(md, "- {}", url);
        }
        if report.failed_urls.len() > 50 {
            let _ = writeln!(md, "\n... and {} more", report.failed_urls.len() - 50);
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PhaseReport;
    use crate::state::Phase;
    use crate::url::Category;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_report() -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        report.phases.push(PhaseReport {
            phase: Phase::Foundation,
            discovered: 1,
            elapsed: Duration::from_millis(200),
        });
        report.phases.push(PhaseReport {
            phase: Phase::Recursive,
            discovered: 41,
            elapsed: Duration::from_secs(60),
        });
        report.stats.total_urls = 42;
        report.stats.by_category.insert(Category::Recipes, 30);
        report.stats.by_category.insert(Category::Homepage, 1);
        report.stats.by_phase.insert(Phase::Recursive, 41);
        report.failed_urls = vec!["https://example.com/broken".to_string()];
        report
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_report(), "https://example.com/");

        assert!(markdown.contains("# Deep-Mapsite Discovery Summary"));
        assert!(markdown.contains("- **Site**: https://example.com/"));
        assert!(markdown.contains("- **Total URLs**: 42"));
        assert!(markdown.contains("| 2. recursive | 41 | 60.0 |"));
        assert!(markdown.contains("| recipes | 30 |"));
        assert!(markdown.contains("- https://example.com/broken"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let markdown = format_markdown_summary(&DiscoveryReport::default(), "https://example.com/");

        assert!(!markdown.contains("## Categories"));
        assert!(!markdown.contains("## Failed URLs"));
        assert!(!markdown.contains("Stopped early"));
    }

    #[test]
    fn test_generate_markdown_summary_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("summary.md");

        generate_markdown_summary(&create_test_report(), "https://example.com/", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Deep-Mapsite Discovery Summary"));
    }
}
