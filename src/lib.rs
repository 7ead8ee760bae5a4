//! Gallery-Harvest: a product gallery crawler
//!
//! This crate discovers every product page that belongs to a paginated
//! gallery, extracts a structured record from each one concurrently, and
//! reports job progress to an observer while the crawl runs.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod progress;

use thiserror::Error;

/// Main error type for Gallery-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to get the first listing page of {url}")]
    Discovery { url: String },

    #[error("No tag id found on product page {url}")]
    MissingTagId { url: String },

    #[error("No data found for {url}, or there is no data to scrape")]
    NoData { url: String },

    #[error("Crawl was cancelled")]
    Cancelled,

    #[error("Crawl exceeded its deadline of {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Document retrieval errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("No document available at {url}")]
    NotFound { url: String },

    #[error("Cannot fetch {url}: {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },
}

impl FetchError {
    /// The URL whose retrieval failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::NotFound { url }
            | Self::InvalidUrl { url, .. } => url,
        }
    }
}

/// Result type alias for Gallery-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, DocumentFetcher, Harvester, HttpFetcher};
pub use model::{Extraction, PaginationResult, ProductRecord, ProductReference};
pub use progress::{JobProgress, JobTracker, ProgressEvent, ProgressPublisher};
