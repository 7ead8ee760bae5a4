use serde::Deserialize;

/// Main configuration structure for Gallery-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of product pages fetched at the same time
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Highest synthetic listing page index probed during discovery
    #[serde(rename = "page-cap")]
    pub page_cap: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Deadline for a whole crawl (seconds); unbounded when absent
    #[serde(rename = "crawl-timeout")]
    pub crawl_timeout: Option<u64>,

    /// What a failed product fetch does to its batch
    #[serde(rename = "failure-policy")]
    pub failure_policy: FailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 10,
            page_cap: 1000,
            request_timeout: 30,
            crawl_timeout: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// How the concurrent crawler reacts to a product page that cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the batch and return the first fetch error
    #[default]
    FailBatch,

    /// Log the failed reference and keep the rest of the batch
    SkipFailed,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "GalleryHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/gallery-harvest".to_string(),
        }
    }
}

/// Progress notification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Number of evenly spaced progress notifications per job
    pub steps: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { steps: 20 }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Records with this many images or fewer are reported as sparse
    #[serde(rename = "sparse-image-threshold")]
    pub sparse_image_threshold: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sparse_image_threshold: 4,
        }
    }
}
