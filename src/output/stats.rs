//! Report and statistics printing
//!
//! This module provides functionality for displaying the final discovery
//! report and the statistics held by the store.

use crate::crawler::DiscoveryReport;
use crate::storage::StoreStats;

/// Prints the final report of a run to stdout
///
/// Reported regardless of whether failures occurred.
pub fn print_report(report: &DiscoveryReport) {
    println!("=== Discovery Report ===\n");

    println!("Phases:");
    for phase in &report.phases {
        println!(
            "  {}. {}: {} new URLs ({:.1}s)",
            phase.phase.number(),
            phase.phase,
            phase.discovered,
            phase.elapsed.as_secs_f64()
        );
    }
    if report.stopped_early {
        println!("  (stopped early: runtime limit reached)");
    }
    println!();

    print_statistics(&report.stats);

    println!("Failed URLs: {}", report.failed_urls.len());
    for url in report.failed_urls.iter().take(20) {
        println!("  - {}", url);
    }
    if report.failed_urls.len() > 20 {
        println!("  ... and {} more", report.failed_urls.len() - 20);
    }
    println!();

    println!("Total time: {:.1}s", report.elapsed.as_secs_f64());
}

/// Prints store statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &StoreStats) {
    println!("Total URLs discovered: {}", stats.total_urls);
    if let Some(updated) = &stats.last_updated {
        println!("Last updated: {}", updated);
    }
    println!();

    println!("URLs by Category:");
    // Sort categories by count (descending)
    let mut category_counts: Vec<_> = stats.by_category.iter().collect();
    category_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (category, count) in category_counts {
        println!(
            "  {}: {} ({:.1}%)",
            category,
            count,
            percentage(*count, stats.total_urls)
        );
    }
    println!();

    println!("URLs by Phase:");
    for (phase, count) in &stats.by_phase {
        println!("  {}: {}", phase, count);
    }
    println!();
}

fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
