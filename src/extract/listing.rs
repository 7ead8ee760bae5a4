//! Listing page parsing
//!
//! The gallery site renders listing pages in (at least) four layouts. Each
//! layout gets its own rule; a page is run through all of them and the
//! results are unioned, because one page can satisfy several rules.

use super::{first_attr, name_from_href, resolve_href, select_all};
use crate::model::ProductReference;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// A layout-specific strategy for finding product references
pub type ListingRule = fn(ElementRef<'_>, &Url) -> Vec<ProductReference>;

/// All listing rules, in the order their matches are accumulated
pub const LISTING_RULES: &[(&str, ListingRule)] = &[
    ("entry-listing", entry_listing),
    ("masonry-grid", masonry_grid),
    ("nested-grid", nested_grid),
    ("photo-gallery", photo_gallery),
];

/// Extracts the product references enumerated by a listing page
///
/// Never fails: a page that matches no layout yields an empty list. The
/// returned references are unique by name; when two rules (or two cards)
/// surface the same name, the first occurrence wins.
///
/// # Arguments
///
/// * `html` - The listing page document
/// * `base_url` - The page's own URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use gallery_harvest::extract::extract_references;
/// use url::Url;
///
/// let html = r#"<div class="grid"><div><div>
///     <a href="/artwork/blue-river.html"><img src="t.jpg"></a>
/// </div></div></div>"#;
/// let base = Url::parse("https://example.com/profile/jane").unwrap();
/// let refs = extract_references(html, &base);
/// assert_eq!(refs[0].name, "blue-river");
/// assert_eq!(refs[0].url, "https://example.com/artwork/blue-river.html");
/// ```
pub fn extract_references(html: &str, base_url: &Url) -> Vec<ProductReference> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut seen_names = HashSet::new();
    let mut references = Vec::new();

    for (rule_name, rule) in LISTING_RULES {
        let found = rule(root, base_url);
        if !found.is_empty() {
            tracing::trace!("Listing rule {} matched {} products", rule_name, found.len());
        }

        for reference in found {
            if seen_names.insert(reference.name.clone()) {
                references.push(reference);
            }
        }
    }

    references
}

/// Profile pages: `article` cards under `#entry-listing`, titled by their image
fn entry_listing(root: ElementRef<'_>, base_url: &Url) -> Vec<ProductReference> {
    select_all(root, ".gallery-area #entry-listing article")
        .into_iter()
        .filter_map(|article| {
            let href = first_attr(article, ".entry-content a", "href")?;
            let name = first_attr(article, ".entry-content .img-default", "title")?;
            let url = resolve_href(&href, base_url)?;
            Some(ProductReference::new(name, url))
        })
        .collect()
}

/// Profile pages laid out as a masonry grid; names come from the link
fn masonry_grid(root: ElementRef<'_>, base_url: &Url) -> Vec<ProductReference> {
    select_all(
        root,
        ".gallery-area .container .grid .container .row .masonry .itemmasonry",
    )
    .into_iter()
    .filter_map(|item| link_named_by_href(item, "div a", base_url))
    .collect()
}

/// Generic `.grid` pages with the product link nested two `div`s deep
fn nested_grid(root: ElementRef<'_>, base_url: &Url) -> Vec<ProductReference> {
    select_all(root, ".grid div div")
        .into_iter()
        .filter_map(|cell| link_named_by_href(cell, "a", base_url))
        .collect()
}

/// Gallery pages built from `gridPhotoGallery__link` anchors with a title
fn photo_gallery(root: ElementRef<'_>, base_url: &Url) -> Vec<ProductReference> {
    select_all(root, ".gallery-area .container .hg_section .container .row div")
        .into_iter()
        .filter_map(|column| {
            let href = first_attr(column, ".gridPhotoGallery__link", "href")?;
            let name = first_attr(column, ".gridPhotoGallery__link", "title")?;
            let url = resolve_href(&href, base_url)?;
            Some(ProductReference::new(name, url))
        })
        .collect()
}

/// Builds a reference from the first link under `scope`, named by its path
fn link_named_by_href(
    scope: ElementRef<'_>,
    link_css: &str,
    base_url: &Url,
) -> Option<ProductReference> {
    let href = first_attr(scope, link_css, "href")?;
    let name = name_from_href(href.trim())?;
    let url = resolve_href(&href, base_url)?;
    Some(ProductReference::new(name, url))
}
