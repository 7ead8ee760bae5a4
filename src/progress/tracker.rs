use super::publisher::{ProgressEvent, ProgressPublisher};
use super::throttle::should_publish;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A crawl that is currently running
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlJob {
    /// Caller-chosen identifier
    pub job_id: String,

    /// Gallery URL the job was started for
    pub url: String,

    /// Number of product pages resolved so far
    pub progress: u64,

    /// Number of product pages in the current batch (0 until known)
    pub max_progress: u64,

    /// When the job was registered
    pub started_at: DateTime<Utc>,
}

impl CrawlJob {
    fn new(job_id: &str, url: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            url: url.to_string(),
            progress: 0,
            max_progress: 0,
            started_at: Utc::now(),
        }
    }

    fn progress(&self) -> JobProgress {
        JobProgress {
            progress: self.progress,
            max_progress: self.max_progress,
        }
    }
}

/// Snapshot of a job's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub progress: u64,
    pub max_progress: u64,
}

/// Process-wide registry of running crawl jobs
///
/// Every mutation happens under one lock, so concurrent increments for the
/// same job are never lost. Progress updates are forwarded to the
/// publisher through the throttle; publish failures are logged only.
pub struct JobTracker {
    jobs: Mutex<HashMap<String, CrawlJob>>,
    publisher: Arc<dyn ProgressPublisher>,
    steps: u64,
}

impl JobTracker {
    /// Creates a tracker publishing about `steps` progress events per job
    pub fn new(publisher: Arc<dyn ProgressPublisher>, steps: u64) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            publisher,
            steps,
        }
    }

    /// Registers a job with zeroed counters, replacing any previous entry
    pub fn create_job(&self, job_id: &str, url: &str) {
        let mut jobs = self.lock();
        if jobs
            .insert(job_id.to_string(), CrawlJob::new(job_id, url))
            .is_some()
        {
            tracing::warn!("Job {} was already registered, restarting it", job_id);
        }
        tracing::debug!("Created job {} for {}", job_id, url);
    }

    /// Overwrites a job's counters, keeping its URL, and notifies observers
    ///
    /// A job that was never created is registered on the fly without a URL.
    /// `progress` is clamped to `max_progress`.
    pub fn update_job(&self, job_id: &str, progress: u64, max_progress: u64) {
        let mut jobs = self.lock();
        let job = jobs
            .entry(job_id.to_string())
            .or_insert_with(|| CrawlJob::new(job_id, ""));

        if progress > max_progress {
            tracing::warn!(
                "Job {}: progress {} exceeds maximum {}, clamping",
                job_id,
                progress,
                max_progress
            );
        }
        job.max_progress = max_progress;
        job.progress = progress.min(max_progress);

        let snapshot = job.progress();
        self.notify(job_id, snapshot);
    }

    /// Counts one more resolved product for a job and notifies observers
    ///
    /// Returns the counters after the increment. Unknown jobs are left
    /// alone and report zeros.
    pub fn advance(&self, job_id: &str) -> JobProgress {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(job_id) else {
            tracing::debug!("Progress for unknown job {} ignored", job_id);
            return JobProgress::default();
        };

        if job.progress < job.max_progress {
            job.progress += 1;
        } else {
            tracing::warn!(
                "Job {} already at {}/{}",
                job_id,
                job.progress,
                job.max_progress
            );
        }

        let snapshot = job.progress();
        self.notify(job_id, snapshot);
        snapshot
    }

    /// Removes a finished job
    pub fn delete_job(&self, job_id: &str) -> Option<CrawlJob> {
        let removed = self.lock().remove(job_id);
        if let Some(job) = &removed {
            let elapsed = Utc::now() - job.started_at;
            tracing::debug!(
                "Deleted job {} after {}ms at {}/{}",
                job_id,
                elapsed.num_milliseconds(),
                job.progress,
                job.max_progress
            );
        }
        removed
    }

    /// Looks up a job
    pub fn fetch_job(&self, job_id: &str) -> Option<CrawlJob> {
        self.lock().get(job_id).cloned()
    }

    /// Current counters of a job; zeros if it finished or never started
    pub fn get_progress(&self, job_id: &str) -> JobProgress {
        self.lock()
            .get(job_id)
            .map(CrawlJob::progress)
            .unwrap_or_default()
    }

    /// Snapshot of every running job, oldest first
    pub fn jobs(&self) -> Vec<CrawlJob> {
        let mut jobs: Vec<CrawlJob> = self.lock().values().cloned().collect();
        jobs.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        jobs
    }

    /// Sends a line to the job's console channel
    pub fn console(&self, job_id: &str, message: impl Into<String>) {
        let event = ProgressEvent::Console {
            job_id: job_id.to_string(),
            message: message.into(),
        };
        self.send(&event);
    }

    /// Publishes a counter update if the throttle lets it through
    fn notify(&self, job_id: &str, snapshot: JobProgress) {
        if !should_publish(snapshot.progress, snapshot.max_progress, self.steps) {
            return;
        }

        let event = ProgressEvent::Progress {
            job_id: job_id.to_string(),
            progress: snapshot.progress,
            max_progress: snapshot.max_progress,
        };
        self.send(&event);
    }

    fn send(&self, event: &ProgressEvent) {
        if let Err(e) = self.publisher.publish(event) {
            tracing::warn!("Failed to publish event for job {}: {}", event.job_id(), e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CrawlJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
