//! Pagination discovery
//!
//! The gallery site never says how many listing pages a gallery has. Pages
//! are addressed as `<gallery>?records=N`; past the last real page the site
//! either serves nothing or starts over with page 1's products. Discovery
//! walks the synthetic pages one by one and stops at the first page that is
//! empty or repeats page 1's first product.

use super::fetcher::DocumentFetcher;
use super::until_cancelled;
use crate::extract::extract_references;
use crate::model::{dedup_references, PaginationResult, ProductReference};
use crate::{FetchError, HarvestError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Query parameter the site uses to address listing pages
pub const RECORDS_PARAM: &str = "records";

/// Returns true if `url` already addresses one specific listing page
///
/// Only a `records` query parameter counts; the same text in the path or
/// inside another parameter's name does not. Unparseable URLs are never
/// single pages.
pub fn is_single_page(url: &str) -> bool {
    Url::parse(url)
        .map(|url| url.query_pairs().any(|(key, _)| key == RECORDS_PARAM))
        .unwrap_or(false)
}

/// Builds the address of synthetic listing page `index`
pub fn synthetic_page_url(base_url: &str, index: u32) -> String {
    format!("{}?{}={}", base_url, RECORDS_PARAM, index)
}

/// Fetches one listing page and extracts its product references
pub async fn references_for_page(
    fetcher: &dyn DocumentFetcher,
    page_url: &str,
) -> Result<Vec<ProductReference>, HarvestError> {
    let base_url = Url::parse(page_url).map_err(|source| FetchError::InvalidUrl {
        url: page_url.to_string(),
        source,
    })?;
    let body = fetcher.fetch_document(page_url).await?;
    let references = extract_references(&body, &base_url);
    tracing::debug!("Found {} products on {}", references.len(), page_url);
    Ok(references)
}

/// Walks a gallery's synthetic listing pages sequentially
pub struct PaginationDiscoverer {
    fetcher: Arc<dyn DocumentFetcher>,
    page_cap: u32,
}

impl PaginationDiscoverer {
    /// Creates a discoverer probing at most `page_cap` listing pages
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, page_cap: u32) -> Self {
        Self {
            fetcher,
            page_cap: page_cap.max(1),
        }
    }

    /// Collects the deduplicated references of every page in a gallery
    ///
    /// # Termination
    ///
    /// Page 1 is the bare `base_url`. Pages 2.. are probed in order until
    /// one of these holds:
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Page has no products | stop, page excluded |
    /// | Page repeats page 1's first product name | stop, page excluded |
    /// | Page answers 404 | stop, page excluded |
    /// | `page_cap` pages fetched | stop |
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationResult)` - References unique by `(name, url)`
    /// * `Err(HarvestError::Discovery)` - Page 1 had no products
    /// * `Err(HarvestError::Fetch)` - A listing page could not be retrieved
    /// * `Err(HarvestError::Cancelled)` - `cancel` fired between pages
    pub async fn discover(
        &self,
        base_url: &str,
        cancel: &CancellationToken,
    ) -> Result<PaginationResult, HarvestError> {
        let first_page = until_cancelled(
            cancel,
            references_for_page(self.fetcher.as_ref(), base_url),
        )
        .await?;

        let Some(sentinel_name) = first_page.first().map(|r| r.name.clone()) else {
            return Err(HarvestError::Discovery {
                url: base_url.to_string(),
            });
        };

        let mut references = first_page;
        let mut pages_iterated = 1;
        let mut exhausted = false;

        for index in 2..=self.page_cap {
            let page_url = synthetic_page_url(base_url, index);
            let page = until_cancelled(
                cancel,
                references_for_page(self.fetcher.as_ref(), &page_url),
            )
            .await;

            let page = match page {
                Ok(page) => page,
                Err(HarvestError::Fetch(FetchError::NotFound { .. })) => {
                    tracing::debug!("Listing page {} does not exist", page_url);
                    exhausted = true;
                    break;
                }
                Err(e) => return Err(e),
            };

            if page.is_empty() {
                tracing::debug!("Listing page {} is empty, gallery exhausted", page_url);
                exhausted = true;
                break;
            }

            if page.iter().any(|r| r.name == sentinel_name) {
                tracing::debug!(
                    "Listing page {} repeats '{}', gallery exhausted",
                    page_url,
                    sentinel_name
                );
                exhausted = true;
                break;
            }

            references.extend(page);
            pages_iterated += 1;
        }

        if !exhausted && self.page_cap > 1 {
            tracing::warn!(
                "Stopped discovery of {} at the cap of {} pages",
                base_url,
                self.page_cap
            );
        }

        let total = references.len();
        let references = dedup_references(references);
        tracing::info!(
            "Discovered {} products ({} duplicates removed) across {} pages of {}",
            references.len(),
            total - references.len(),
            pages_iterated,
            base_url
        );

        Ok(PaginationResult {
            references,
            pages_iterated,
        })
    }
}
