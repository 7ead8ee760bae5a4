//! Crawl job progress tracking
//!
//! This module handles:
//! - The process-wide registry of running crawl jobs and their counters
//! - Throttling progress notifications to roughly one per 5% of completion
//! - Forwarding progress and console events to an external publisher

mod publisher;
mod throttle;
mod tracker;

pub use publisher::{
    ChannelPublisher, LogPublisher, NullPublisher, ProgressEvent, ProgressPublisher,
    PublishError,
};
pub use throttle::should_publish;
pub use tracker::{CrawlJob, JobProgress, JobTracker};
