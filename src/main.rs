//! Washi-Press main entry point
//!
//! This is the command-line interface for the Washi-Press web page archiver.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use washi_press::config::load_config;
use washi_press::crawler::crawl;
use washi_press::Config;

/// Washi-Press: a web page archiver
///
/// Washi-Press crawls outward from a seed URL, flattens every reachable
/// HTML page to plain text, downloads linked PDF documents, and archives
/// both into an object store together with CSV metadata and failure
/// exports.
#[derive(Parser, Debug)]
#[command(name = "washi-press")]
#[command(version = "1.0.0")]
#[command(about = "A web page archiver", long_about = None)]
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

    /// Delete the visited log and start over instead of resuming
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("washi_press=info,warn"),
            1 => EnvFilter::new("washi_press=debug,info"),
            2 => EnvFilter::new("washi_press=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Washi-Press Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Visited log: {}", config.crawler.visited_log);
    println!(
        "  Exclusion patterns ({}):",
        config.crawler.exclude_patterns.len()
    );
    for pattern in &config.crawler.exclude_patterns {
        println!("    - {}", pattern);
    }

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Page load timeout: {}s", config.fetcher.page_load_timeout);
    println!("  Request timeout: {}s", config.fetcher.request_timeout);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout);

    println!("\nStorage:");
    println!("  Bucket: {}", config.storage.bucket);
    println!("  Text prefix: {}", config.storage.text_prefix);
    println!("  Binary prefix: {}", config.storage.binary_prefix);
    println!("  Metadata key: {}", config.storage.metadata_key);
    println!("  Failures key: {}", config.storage.failures_key);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.crawler.seed_url);
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        let log = Path::new(&config.crawler.visited_log);
        if log.exists() {
            std::fs::remove_file(log).with_context(|| {
                format!(
                    "Failed to remove visited log: {}",
                    config.crawler.visited_log
                )
            })?;
            tracing::info!("Removed visited log: {}", config.crawler.visited_log);
        }
        tracing::info!("Starting fresh crawl");
    } else {
        tracing::info!("Starting crawl (resumes from the visited log when present)");
    }

    tracing::info!(
        "Seed: {} ({} exclusion patterns)",
        config.crawler.seed_url,
        config.crawler.exclude_patterns.len()
    );

    // Run the crawler
    match crawl(config).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
