//! Document retrieval
//!
//! The crawler only ever needs "give me the HTML at this URL". That
//! capability is the `DocumentFetcher` trait so the engine can run against
//! the network (`HttpFetcher`) or against canned documents in tests.

use crate::config::Config;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Retrieves raw document text for a URL
///
/// A single attempt: no retries, any failure is returned to the caller.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Example
///
/// ```no_run
/// use gallery_harvest::config::Config;
/// use gallery_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.user_agent.crawler_name,
        config.user_agent.crawler_version,
        config.user_agent.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher with a client built from `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Retrieved {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
