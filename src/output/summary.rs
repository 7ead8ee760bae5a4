//! Crawl summary generation

use crate::crawler::CrawlOutcome;
use std::time::Duration;

/// A record with suspiciously few images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseRecord {
    pub name: String,
    pub link: String,
    pub image_count: usize,
}

/// Overview of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Gallery URL that was crawled
    pub url: String,

    /// Number of records extracted
    pub total_records: usize,

    /// Number of listing pages the records came from
    pub pages_iterated: u32,

    /// Total images across all records
    pub total_images: usize,

    /// Records at or below the sparse-image threshold
    pub sparse_records: Vec<SparseRecord>,

    /// Records without a description
    pub missing_descriptions: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Summarizes a crawl outcome
    ///
    /// # Arguments
    ///
    /// * `url` - The gallery URL the crawl was started for
    /// * `outcome` - The finished crawl
    /// * `sparse_threshold` - Records with this many images or fewer are listed
    pub fn from_outcome(url: &str, outcome: &CrawlOutcome, sparse_threshold: usize) -> Self {
        let mut sparse_records: Vec<SparseRecord> = outcome
            .records
            .iter()
            .filter(|r| r.is_sparse(sparse_threshold))
            .map(|r| SparseRecord {
                name: r.name.clone(),
                link: r.link.clone(),
                image_count: r.images.len(),
            })
            .collect();
        sparse_records.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            url: url.to_string(),
            total_records: outcome.records.len(),
            pages_iterated: outcome.pages_iterated,
            total_images: outcome.records.iter().map(|r| r.images.len()).sum(),
            sparse_records,
            missing_descriptions: outcome
                .records
                .iter()
                .filter(|r| r.description.is_empty())
                .count(),
            elapsed: outcome.elapsed,
        }
    }
}

/// Formats a crawl summary for the terminal
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Gallery Harvest Summary ===\n\n");
    out.push_str(&format!("Gallery: {}\n", summary.url));
    out.push_str(&format!("  Listing pages: {}\n", summary.pages_iterated));
    out.push_str(&format!("  Products extracted: {}\n", summary.total_records));
    out.push_str(&format!("  Images: {}\n", summary.total_images));
    out.push_str(&format!(
        "  Without description: {}\n",
        summary.missing_descriptions
    ));
    out.push_str(&format!(
        "  Duration: {:.1}s\n",
        summary.elapsed.as_secs_f64()
    ));

    if !summary.sparse_records.is_empty() {
        out.push_str(&format!(
            "\nProducts with few images ({}):\n",
            summary.sparse_records.len()
        ));
        for record in &summary.sparse_records {
            out.push_str(&format!(
                "  - {} ({} images) {}\n",
                record.name, record.image_count, record.link
            ));
        }
    }

    out
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
