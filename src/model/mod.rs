//! Data model for gallery crawls
//!
//! # Components
//!
//! - `ProductReference`: a product discovered on a listing page (name + url)
//! - `ProductRecord`: the structured record extracted from a product page
//! - `Extraction`: explicit outcome of a best-effort field extraction
//! - `PaginationResult`: the deduplicated references of a whole gallery

mod extraction;
mod record;
mod reference;

pub use extraction::Extraction;
pub use record::ProductRecord;
pub use reference::{dedup_references, PaginationResult, ProductReference};
