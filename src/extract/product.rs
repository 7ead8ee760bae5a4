//! Product page parsing
//!
//! A product page carries three independent pieces of information: the
//! image carousel (plus an optional featured image further down), the
//! numeric tag printed next to the product, and an optional description
//! in a full-width block. Each is probed separately and none of them
//! depends on the others being present.

use super::{
    collapse_whitespace, element_text, first_attr, normalize_image_url, normalize_link,
    parse_tag_id, select_all, select_first,
};
use crate::model::{Extraction, ProductRecord, ProductReference};
use crate::HarvestError;
use scraper::{ElementRef, Html};
use std::collections::HashSet;

/// Everything found on a product page, before it is bound to a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    /// Normalized carousel images, in page order
    pub images: Vec<String>,

    /// The single image shown in the featured tab section
    pub featured_image: Extraction<String>,

    /// `#<digits>` tag identifier
    pub tag_id: Extraction<String>,

    /// Whitespace-normalized description text
    pub description: Extraction<String>,
}

impl ProductPage {
    /// Binds the page to the reference it was fetched for
    ///
    /// # Returns
    ///
    /// * `Ok(ProductRecord)` - The page had a tag id
    /// * `Err(HarvestError::MissingTagId)` - The tag id is mandatory
    pub fn into_record(self, reference: &ProductReference) -> Result<ProductRecord, HarvestError> {
        let tag_id = self
            .tag_id
            .into_option()
            .ok_or_else(|| HarvestError::MissingTagId {
                url: reference.url.clone(),
            })?;

        let mut images = self.images;
        if let Extraction::Found(featured) = self.featured_image {
            images.push(featured);
        }

        Ok(ProductRecord {
            name: reference.name.clone(),
            tag_id,
            images,
            link: normalize_link(&reference.url),
            description: self.description.unwrap_or_empty(),
        })
    }
}

/// Parses a product page document
///
/// Pure function of the document: parsing the same text twice yields
/// equal results.
pub fn parse_product_page(html: &str) -> ProductPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    ProductPage {
        images: carousel_images(root),
        featured_image: featured_image(root),
        tag_id: tag_id(root),
        description: description(root),
    }
}

/// Extracts the product record for `reference` from its page document
///
/// # Example
///
/// ```
/// use gallery_harvest::extract::extract_product;
/// use gallery_harvest::ProductReference;
///
/// let html = r#"<div class="container"><div class="row">
///   <ol><li><img src="https://cdn.example.com/small1.jpg"></li></ol>
///   <div class="fadein2s"><div><div><font>Tag 3310</font></div></div></div>
/// </div></div>"#;
/// let reference = ProductReference::new("Dune", "https://example.com/art/dune.html?ref=1");
///
/// let record = extract_product(html, &reference).unwrap();
/// assert_eq!(record.tag_id, "#3310");
/// assert_eq!(record.images, vec!["https://cdn.example.com/1.jpg"]);
/// assert_eq!(record.link, "https://example.com/art/dune");
/// ```
pub fn extract_product(
    html: &str,
    reference: &ProductReference,
) -> Result<ProductRecord, HarvestError> {
    parse_product_page(html).into_record(reference)
}

/// Carousel images from both list-item and anchor based markup
///
/// An `img` element reachable through both shapes (an anchor inside a
/// list item) is counted once. Distinct slides showing the same URL are
/// all kept.
fn carousel_images(root: ElementRef<'_>) -> Vec<String> {
    let list_items = select_all(root, ".container .row ol li");
    let anchors = select_all(root, ".container .row ol a");

    let mut seen = HashSet::new();
    list_items
        .into_iter()
        .chain(anchors)
        .filter_map(|slide| select_first(slide, "img"))
        .filter(|img| seen.insert(img.id()))
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(normalize_image_url)
        .collect()
}

/// The full-size image in the first tab of the featured section
fn featured_image(root: ElementRef<'_>) -> Extraction<String> {
    select_all(root, "section .container .row div .tabbable .tab-content")
        .into_iter()
        .next()
        .and_then(|tab| first_attr(tab, ".tx2s .fancybox-effects-a img", "src"))
        .into()
}

/// First digit run inside the `font` tags of the innermost info block
fn tag_id(root: ElementRef<'_>) -> Extraction<String> {
    let Some(info) = select_all(root, ".container .row .fadein2s div div").pop() else {
        return Extraction::Absent;
    };

    let text: String = select_all(info, "font")
        .into_iter()
        .map(element_text)
        .collect();

    parse_tag_id(&text).into()
}

/// Description text from the second column of the full-width block
fn description(root: ElementRef<'_>) -> Extraction<String> {
    let column = select_all(root, ".container-full .container .row")
        .into_iter()
        .flat_map(|row| row.children().filter_map(ElementRef::wrap))
        .nth(1);

    column
        .and_then(|column| select_all(column, "font").pop())
        .map(|font| collapse_whitespace(&element_text(font)))
        .filter(|text| !text.is_empty())
        .into()
}
