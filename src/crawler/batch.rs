//! Concurrent product extraction
//!
//! A batch of references is fanned out into one task per product page.
//! A semaphore caps how many pages are in flight at once; results are
//! collected in completion order and every resolved page advances the
//! job's progress counter.

use super::fetcher::DocumentFetcher;
use crate::config::FailurePolicy;
use crate::extract::extract_product;
use crate::model::{ProductRecord, ProductReference};
use crate::progress::JobTracker;
use crate::HarvestError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Extracts product records from many product pages at once
pub struct ConcurrentCrawler {
    fetcher: Arc<dyn DocumentFetcher>,
    tracker: Arc<JobTracker>,
    permits: Arc<Semaphore>,
    policy: FailurePolicy,
}

impl ConcurrentCrawler {
    /// Creates a crawler fetching at most `max_concurrent` pages at a time
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        tracker: Arc<JobTracker>,
        max_concurrent: usize,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            fetcher,
            tracker,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            policy,
        }
    }

    /// Crawls every reference of a batch and returns the extracted records
    ///
    /// The job's maximum is set to the batch size before any page is
    /// fetched. Records come back in completion order, not input order.
    ///
    /// # Failure handling
    ///
    /// | Outcome for one reference | Effect |
    /// |---------------------------|--------|
    /// | No tag id on the page | record dropped, batch continues |
    /// | Fetch failed, `FailBatch` | remaining tasks aborted, error returned |
    /// | Fetch failed, `SkipFailed` | reference logged and skipped |
    /// | `cancel` fired | remaining tasks aborted, `Cancelled` returned |
    pub async fn crawl_batch(
        &self,
        references: Vec<ProductReference>,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProductRecord>, HarvestError> {
        let total = references.len();
        self.tracker.update_job(job_id, 0, total as u64);
        tracing::info!("Extracting {} product pages for job {}", total, job_id);

        let mut tasks = JoinSet::new();
        for reference in references {
            let fetcher = Arc::clone(&self.fetcher);
            let tracker = Arc::clone(&self.tracker);
            let permits = Arc::clone(&self.permits);
            let job_id = job_id.to_string();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (reference, Err(HarvestError::Cancelled));
                };

                let body = match fetcher.fetch_document(&reference.url).await {
                    Ok(body) => body,
                    Err(e) => return (reference, Err(HarvestError::from(e))),
                };
                tracker.console(&job_id, format!("Retrieved body for: {}", reference.url));

                let record = extract_product(&body, &reference);
                (reference, record)
            });
        }

        let mut records = Vec::with_capacity(total);
        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    tracing::info!("Job {} cancelled with {} pages outstanding", job_id, tasks.len());
                    return Err(HarvestError::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };
            let (reference, outcome) = joined?;

            match outcome {
                Ok(record) => {
                    self.tracker
                        .console(job_id, format!("Resolved data for: {}", reference.url));
                    records.push(record);
                }
                Err(HarvestError::MissingTagId { url }) => {
                    tracing::warn!("Dropping {} ({}): no tag id on page", reference.name, url);
                }
                Err(HarvestError::Fetch(e)) if self.policy == FailurePolicy::SkipFailed => {
                    tracing::warn!("Skipping {}: {}", reference.name, e);
                }
                Err(e) => {
                    tasks.abort_all();
                    tracing::error!("Batch for job {} failed on {}: {}", job_id, reference.url, e);
                    return Err(e);
                }
            }

            let progress = self.tracker.advance(job_id);
            tracing::debug!(
                "Job {}: {} resolved, {} left",
                job_id,
                progress.progress,
                tasks.len()
            );
        }

        tracing::info!(
            "Extracted {} of {} products for job {}",
            records.len(),
            total,
            job_id
        );
        Ok(records)
    }
}
