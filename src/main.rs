//! Deep-Mapsite main entry point
//!
//! This is the command-line interface for the Deep-Mapsite discovery engine.

use anyhow::Context;
use clap::Parser;
use deep_mapsite::config::{load_config_with_hash, Config};
use deep_mapsite::crawler::run_discovery;
use deep_mapsite::output::{
    export_mapsite, generate_markdown_summary, print_report, print_statistics,
};
use deep_mapsite::storage::{open_storage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Deep-Mapsite: exhaustive discovery of an authenticated website
///
/// Deep-Mapsite maps every reachable same-domain URL of a site in four
/// phases (seed, breadth-first recursion, interaction, and numeric pattern
/// completion) and persists the result in an idempotent SQLite store.
#[derive(Parser, Debug)]
#[command(name = "deep-mapsite")]
#[command(version = "1.0.0")]
#[command(about = "Exhaustive URL discovery for authenticated sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Clear the store before discovering
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be discovered without fetching
    #[arg(long, conflicts_with_all = ["stats", "export_mapsite", "fresh"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_mapsite", "fresh"])]
    stats: bool,

    /// Export the mapsite JSON from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "fresh"])]
    export_mapsite: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_mapsite {
        handle_export_mapsite(&config)?;
    } else {
        handle_discovery(config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deep_mapsite=info,warn"),
            1 => EnvFilter::new("deep_mapsite=debug,info"),
            2 => EnvFilter::new("deep_mapsite=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Deep-Mapsite Dry Run ===\n");

    println!("Site:");
    println!("  Seed URL: {}", config.site.base_url);
    println!("  Base domain: {}", config.base_domain());
    println!("  User agent: {}", config.site.user_agent);

    println!("\nAuthentication:");
    match (&config.auth.username, &config.auth.cookie) {
        (Some(user), _) => println!("  HTTP Basic as {}", user),
        (None, Some(_)) => println!("  Session cookie"),
        (None, None) => println!("  None (anonymous)"),
    }

    let crawler = &config.crawler;
    println!("\nDiscovery:");
    println!("  Request delay: {}ms", crawler.request_delay_ms);
    println!("  Pattern delay: {}ms", crawler.pattern_delay_ms);
    println!("  Interaction delay: {}ms", crawler.interaction_delay_ms);
    println!("  Request timeout: {}s", crawler.request_timeout_secs);
    println!("  Min content length: {}", crawler.min_content_length);
    println!("  Samples per category: {}", crawler.samples_per_category);
    println!("  Max pagination clicks: {}", crawler.max_pagination_clicks);
    println!("  Search terms: {}", crawler.search_terms.join(", "));
    if let Some(max) = crawler.max_queue_size {
        println!("  Max queue size: {}", max);
    }
    if let Some(secs) = crawler.max_runtime_secs {
        println!("  Max runtime: {}s", secs);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Mapsite: {}", config.output.mapsite_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start discovery at {}", config.site.base_url);
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    print_statistics(&storage.stats()?);

    Ok(())
}

/// Handles the --export-mapsite mode: writes the mapsite JSON
fn handle_export_mapsite(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let count = export_mapsite(&storage, Path::new(&config.output.mapsite_path))?;

    println!(
        "✓ Exported {} URLs to: {}",
        count, config.output.mapsite_path
    );

    Ok(())
}

/// Handles the main discovery run
async fn handle_discovery(config: Config, fresh: bool) -> anyhow::Result<()> {
    let storage = Arc::new(open_storage(Path::new(&config.output.database_path))?);

    if fresh {
        tracing::info!("Starting fresh discovery (clearing previous results)");
        storage.clear()?;
    } else {
        let known = storage.stats()?.total_urls;
        tracing::info!("Starting discovery ({} URLs already known)", known);
    }

    let base_url = config.site.base_url.clone();
    let mapsite_path = PathBuf::from(&config.output.mapsite_path);
    let summary_path = PathBuf::from(&config.output.summary_path);

    let report = match run_discovery(config, storage.clone()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    export_mapsite(storage.as_ref(), &mapsite_path)?;
    generate_markdown_summary(&report, &base_url, &summary_path)?;
    tracing::info!("Summary written to {}", summary_path.display());

    Ok(())
}
