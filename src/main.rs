//! Gallery-Harvest main entry point
//!
//! This is the command-line interface for the Gallery-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use gallery_harvest::config::{load_config_with_hash, Config};
use gallery_harvest::crawler::{is_single_page, Harvester};
use gallery_harvest::output::{
    format_summary, print_summary, records_to_json, write_records_json, CrawlSummary,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Gallery-Harvest: a product gallery crawler
///
/// Discovers every listing page of a gallery, extracts each product's
/// name, images, tag id and description, and writes them as JSON.
#[derive(Parser, Debug)]
#[command(name = "gallery-harvest")]
#[command(version)]
#[command(about = "A product gallery crawler", long_about = None)]
struct Cli {
    /// Gallery or profile URL (append ?records=N to crawl a single listing page)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Identifier to track the crawl under (generated when omitted)
    #[arg(long)]
    job_id: Option<String>,

    /// Write the records to this JSON file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only discover product references; do not visit product pages
    #[arg(long, conflicts_with = "dry_run")]
    list_only: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "list_only")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.url);
        return Ok(());
    }

    let harvester = Harvester::from_config(config.clone())?;

    if cli.list_only {
        return handle_list_only(&harvester, &cli.url).await;
    }

    let job_id = cli
        .job_id
        .clone()
        .unwrap_or_else(|| format!("job-{}", chrono::Utc::now().timestamp_millis()));
    handle_crawl(&harvester, &config, &cli, &job_id).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gallery_harvest=info,warn"),
            1 => EnvFilter::new("gallery_harvest=debug,info"),
            2 => EnvFilter::new("gallery_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, url: &str) {
    println!("=== Gallery-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Page cap: {}", config.crawler.page_cap);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    match config.crawler.crawl_timeout {
        Some(seconds) => println!("  Crawl timeout: {}s", seconds),
        None => println!("  Crawl timeout: none"),
    }
    println!("  Failure policy: {:?}", config.crawler.failure_policy);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nProgress steps per job: {}", config.progress.steps);
    println!(
        "Sparse image threshold: {}",
        config.output.sparse_image_threshold
    );

    println!("\n✓ Configuration is valid");
    if is_single_page(url) {
        println!("✓ Would crawl the single listing page {}", url);
    } else {
        println!(
            "✓ Would discover up to {} listing pages of {}",
            config.crawler.page_cap, url
        );
    }
}

/// Handles the --list-only mode: prints discovered references
async fn handle_list_only(harvester: &Harvester, url: &str) -> anyhow::Result<()> {
    let pagination = harvester.discover_pages(url).await?;

    for reference in &pagination.references {
        println!("{}\t{}", reference.name, reference.url);
    }
    tracing::info!(
        "{} products on {} listing pages",
        pagination.references.len(),
        pagination.pages_iterated
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    harvester: &Harvester,
    config: &Config,
    cli: &Cli,
    job_id: &str,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            on_interrupt.cancel();
        }
    });

    let outcome = harvester
        .run_crawl_with_cancel(&cli.url, job_id, cancel)
        .await?;

    match &cli.output {
        Some(path) => {
            write_records_json(&outcome.records, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} records to {}", outcome.records.len(), path.display());
        }
        None => println!("{}", records_to_json(&outcome.records)?),
    }

    if !cli.quiet {
        let summary =
            CrawlSummary::from_outcome(&cli.url, &outcome, config.output.sparse_image_threshold);
        if cli.output.is_some() {
            print_summary(&summary);
        } else {
            eprint!("{}", format_summary(&summary));
        }
    }

    Ok(())
}
