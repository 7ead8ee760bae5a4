//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Registering the job before any page is fetched
//! - Choosing between full discovery and a single listing page
//! - Running the concurrent extraction batch
//! - Enforcing the crawl deadline and cancellation
//! - Removing the job once the crawl ends, whatever the outcome

use super::batch::ConcurrentCrawler;
use super::discovery::{is_single_page, references_for_page, PaginationDiscoverer};
use super::fetcher::{DocumentFetcher, HttpFetcher};
use super::until_cancelled;
use crate::config::Config;
use crate::model::{PaginationResult, ProductRecord, ProductReference};
use crate::progress::{CrawlJob, JobProgress, JobTracker, LogPublisher, ProgressPublisher};
use crate::HarvestError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Result of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Extracted records, in completion order
    pub records: Vec<ProductRecord>,

    /// Number of listing pages the records came from
    pub pages_iterated: u32,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
///
/// One `Harvester` serves any number of crawls, concurrently if needed;
/// each crawl is tracked under its own job id.
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Arc<dyn DocumentFetcher>,
    tracker: Arc<JobTracker>,
    discoverer: PaginationDiscoverer,
    crawler: ConcurrentCrawler,
}

impl Harvester {
    /// Creates a harvester from its collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Where documents come from
    /// * `publisher` - Where job progress and console events go
    pub fn new(
        config: Config,
        fetcher: Arc<dyn DocumentFetcher>,
        publisher: Arc<dyn ProgressPublisher>,
    ) -> Self {
        let tracker = Arc::new(JobTracker::new(publisher, config.progress.steps));
        let discoverer = PaginationDiscoverer::new(Arc::clone(&fetcher), config.crawler.page_cap);
        let crawler = ConcurrentCrawler::new(
            Arc::clone(&fetcher),
            Arc::clone(&tracker),
            config.crawler.max_concurrent_fetches as usize,
            config.crawler.failure_policy,
        );

        Self {
            config: Arc::new(config),
            fetcher,
            tracker,
            discoverer,
            crawler,
        }
    }

    /// Creates a harvester that fetches over HTTP and logs progress
    pub fn from_config(config: Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::new(config, Arc::new(fetcher), Arc::new(LogPublisher)))
    }

    /// The job registry shared by every crawl of this harvester
    pub fn tracker(&self) -> &Arc<JobTracker> {
        &self.tracker
    }

    /// Current counters of a job; zeros if it finished or never started
    pub fn get_progress(&self, job_id: &str) -> JobProgress {
        self.tracker.get_progress(job_id)
    }

    /// Snapshot of every running job
    pub fn jobs(&self) -> Vec<CrawlJob> {
        self.tracker.jobs()
    }

    /// Product references of a single listing page
    pub async fn references_for_page(
        &self,
        page_url: &str,
    ) -> Result<Vec<ProductReference>, HarvestError> {
        references_for_page(self.fetcher.as_ref(), page_url).await
    }

    /// Every product reference of a gallery
    ///
    /// A URL that already names a listing page (`?records=N`) is not
    /// paginated: its own references are returned as a one-page result.
    pub async fn discover_pages(&self, url: &str) -> Result<PaginationResult, HarvestError> {
        self.discover_with_cancel(url, &CancellationToken::new())
            .await
    }

    /// Extracts one batch of references under `job_id`
    ///
    /// The job does not need to exist beforehand; its counters are
    /// (re)initialised to the batch size. The job stays registered so
    /// further batches can report under it; call [`Harvester::finish_job`]
    /// once the last batch is done.
    pub async fn crawl_references(
        &self,
        references: Vec<ProductReference>,
        job_id: &str,
    ) -> Result<Vec<ProductRecord>, HarvestError> {
        self.crawler
            .crawl_batch(references, job_id, &CancellationToken::new())
            .await
    }

    /// Removes a job driven through the step-wise operations
    ///
    /// Returns the job's final state, or None if it was never registered.
    pub fn finish_job(&self, job_id: &str) -> Option<CrawlJob> {
        self.tracker.delete_job(job_id)
    }

    /// Runs a complete crawl of `url`, tracked as `job_id`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - At least one record was extracted
    /// * `Err(HarvestError::NoData)` - The crawl finished with no records
    /// * `Err(HarvestError::Discovery)` - The gallery's first page was empty
    /// * `Err(HarvestError::Fetch)` - A document could not be retrieved
    /// * `Err(HarvestError::TimedOut)` - The configured deadline passed
    pub async fn run_crawl(&self, url: &str, job_id: &str) -> Result<CrawlOutcome, HarvestError> {
        self.run_crawl_with_cancel(url, job_id, CancellationToken::new())
            .await
    }

    /// Runs a complete crawl that stops early when `cancel` fires
    pub async fn run_crawl_with_cancel(
        &self,
        url: &str,
        job_id: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, HarvestError> {
        tracing::info!("Starting job {} for {}", job_id, url);
        self.tracker.create_job(job_id, url);

        let crawl = self.crawl(url, job_id, &cancel);
        let result = match self.config.crawler.crawl_timeout {
            Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), crawl)
                .await
                .unwrap_or(Err(HarvestError::TimedOut { seconds })),
            None => crawl.await,
        };

        self.tracker.delete_job(job_id);

        match &result {
            Ok(outcome) => tracing::info!(
                "Job {} completed: {} products from {} pages in {:?}",
                job_id,
                outcome.records.len(),
                outcome.pages_iterated,
                outcome.elapsed
            ),
            Err(e) => tracing::error!("Job {} failed: {}", job_id, e),
        }

        result
    }

    async fn crawl(
        &self,
        url: &str,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlOutcome, HarvestError> {
        let start_time = Instant::now();

        let pagination = self.discover_with_cancel(url, cancel).await?;
        self.tracker.console(
            job_id,
            format!(
                "Found {} products on {} pages",
                pagination.references.len(),
                pagination.pages_iterated
            ),
        );

        let records = self
            .crawler
            .crawl_batch(pagination.references, job_id, cancel)
            .await?;

        if records.is_empty() {
            return Err(HarvestError::NoData {
                url: url.to_string(),
            });
        }

        let threshold = self.config.output.sparse_image_threshold;
        for record in records.iter().filter(|r| r.is_sparse(threshold)) {
            tracing::warn!(
                "Product with {} images: {} {}",
                record.images.len(),
                record.name,
                record.link
            );
        }

        Ok(CrawlOutcome {
            records,
            pages_iterated: pagination.pages_iterated,
            elapsed: start_time.elapsed(),
        })
    }

    async fn discover_with_cancel(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<PaginationResult, HarvestError> {
        if is_single_page(url) {
            tracing::info!("Scraping individual listing page {}", url);
            let references =
                until_cancelled(cancel, references_for_page(self.fetcher.as_ref(), url)).await?;
            return Ok(PaginationResult {
                references,
                pages_iterated: 1,
            });
        }

        self.discoverer.discover(url, cancel).await
    }
}
