//! Output module for crawl results
//!
//! This module handles:
//! - Summarizing a finished crawl (counts, sparse records, timing)
//! - Exporting the extracted records as JSON

mod json;
mod summary;

pub use json::{records_to_json, write_records_json};
pub use summary::{format_summary, print_summary, CrawlSummary, SparseRecord};
