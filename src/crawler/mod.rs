//! Crawler module for gallery discovery and product extraction
//!
//! This module contains the crawl engine, including:
//! - Document fetching behind a swappable trait
//! - Sequential pagination discovery over synthetic listing pages
//! - Bounded concurrent extraction of product pages
//! - Overall crawl coordination and job bookkeeping

mod batch;
mod coordinator;
mod discovery;
mod fetcher;

pub use batch::ConcurrentCrawler;
pub use coordinator::{CrawlOutcome, Harvester};
pub use discovery::{
    is_single_page, references_for_page, synthetic_page_url, PaginationDiscoverer, RECORDS_PARAM,
};
pub use fetcher::{build_http_client, DocumentFetcher, HttpFetcher};

use crate::config::Config;
use crate::HarvestError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl of one gallery
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Build an HTTP fetcher from the configuration
/// 2. Discover every listing page of the gallery (unless `url` names one)
/// 3. Extract all product pages concurrently
/// 4. Report progress for `job_id` through the tracing log
///
/// # Example
///
/// ```no_run
/// use gallery_harvest::config::Config;
/// use gallery_harvest::crawler::harvest;
///
/// # async fn example() -> Result<(), gallery_harvest::HarvestError> {
/// let outcome = harvest(Config::default(), "https://example.com/profile/jane", "job-1").await?;
/// println!("{} products on {} pages", outcome.records.len(), outcome.pages_iterated);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: Config, url: &str, job_id: &str) -> Result<CrawlOutcome, HarvestError> {
    Harvester::from_config(config)?.run_crawl(url, job_id).await
}

/// Drives `future` to completion unless `cancel` fires first
async fn until_cancelled<T, F>(cancel: &CancellationToken, future: F) -> Result<T, HarvestError>
where
    F: Future<Output = Result<T, HarvestError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HarvestError::Cancelled),
        result = future => result,
    }
}
