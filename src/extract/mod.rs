//! Field extraction from gallery markup
//!
//! This module turns raw HTML into the crawl's data model:
//! - Listing pages into the product references they enumerate
//! - Product pages into structured product records
//! - Raw attribute and text values into their normalized form
//!
//! Every layout variant the site uses is a separate, named rule. Rules
//! never fail on missing markup; they simply produce nothing.

mod listing;
mod normalize;
mod product;

pub use listing::{extract_references, ListingRule, LISTING_RULES};
pub use normalize::{
    collapse_whitespace, name_from_href, normalize_image_url, normalize_link, parse_tag_id,
    resolve_href,
};
pub use product::{extract_product, parse_product_page, ProductPage};

use scraper::{ElementRef, Selector};

/// Selects every descendant of `scope` matching `css`, in document order
///
/// An unparseable selector matches nothing.
fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    let matches = scope.select(&selector).collect();
    matches
}

/// Selects the first descendant of `scope` matching `css`
fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let first = scope.select(&selector).next();
    first
}

/// Reads a non-empty attribute from the first element matching `css`
fn first_attr(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    select_first(scope, css)?
        .value()
        .attr(attr)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// Concatenated text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
