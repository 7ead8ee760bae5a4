use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

/// A notification about a running crawl job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum ProgressEvent {
    /// Counter update, subject to throttling
    #[serde(rename = "jobProgress", rename_all = "camelCase")]
    Progress {
        job_id: String,
        progress: u64,
        max_progress: u64,
    },

    /// Free-form line for the job's console, never throttled
    #[serde(rename = "job-console", rename_all = "camelCase")]
    Console { job_id: String, message: String },
}

impl ProgressEvent {
    /// The job this event belongs to
    pub fn job_id(&self) -> &str {
        match self {
            Self::Progress { job_id, .. } | Self::Console { job_id, .. } => job_id,
        }
    }
}

/// Errors a publisher can report; they are logged and never propagated
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Notification channel is closed")]
    Closed,

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Outbound notification channel for job events
///
/// Publishing is fire-and-forget. Implementations are called while the
/// job registry is locked, so they must not block.
pub trait ProgressPublisher: Send + Sync {
    fn publish(&self, event: &ProgressEvent) -> Result<(), PublishError>;
}

/// Writes events to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

impl ProgressPublisher for LogPublisher {
    fn publish(&self, event: &ProgressEvent) -> Result<(), PublishError> {
        match event {
            ProgressEvent::Progress {
                job_id,
                progress,
                max_progress,
            } => {
                tracing::info!("Job {}: {}/{} products", job_id, progress, max_progress);
            }
            ProgressEvent::Console { job_id, message } => {
                tracing::debug!("Job {}: {}", job_id, message);
            }
        }
        Ok(())
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl ProgressPublisher for NullPublisher {
    fn publish(&self, _event: &ProgressEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Fans events out to any number of in-process subscribers
///
/// Suitable as the source of a push transport (websocket, SSE, pub/sub
/// bridge). Events sent while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ChannelPublisher {
    /// Creates a publisher buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Opens a new subscription; it only sees events sent after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl ProgressPublisher for ChannelPublisher {
    fn publish(&self, event: &ProgressEvent) -> Result<(), PublishError> {
        if self.sender.receiver_count() == 0 {
            tracing::trace!("No subscribers for job {}", event.job_id());
            return Ok(());
        }

        self.sender
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| PublishError::Closed)
    }
}
