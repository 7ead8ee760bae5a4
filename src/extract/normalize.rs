//! Normalization of values pulled out of gallery markup

use url::Url;

/// Rewrites a thumbnail URL into its full-resolution variant
///
/// The site serves thumbnails under the same name with a `small` marker;
/// dropping the first occurrence yields the full-size asset.
///
/// # Example
///
/// ```
/// use gallery_harvest::extract::normalize_image_url;
///
/// assert_eq!(
///     normalize_image_url("https://cdn.example.com/img/small-cover.jpg"),
///     "https://cdn.example.com/img/-cover.jpg"
/// );
/// ```
pub fn normalize_image_url(src: &str) -> String {
    src.replacen("small", "", 1)
}

/// Truncates a product URL at its first `.html`
///
/// Everything after the extension (query strings, fragments, stray
/// whitespace) is dropped with it. URLs without `.html` are unchanged.
pub fn normalize_link(url: &str) -> String {
    match url.find(".html") {
        Some(end) => url[..end].to_string(),
        None => url.to_string(),
    }
}

/// Collapses every whitespace run into a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats the first run of ASCII digits in `text` as `#<digits>`
pub fn parse_tag_id(text: &str) -> Option<String> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(format!("#{}", digits))
}

/// Derives a product name from the last path segment of its link
///
/// Used by layouts that carry no title attribute. Returns None when the
/// link ends in a slash and there is nothing to name the product by.
pub fn name_from_href(href: &str) -> Option<String> {
    let segment = href.rsplit('/').next()?;
    let name = segment.replacen(".html", "", 1);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Resolves a link href against the page it was found on
///
/// Returns None for hrefs that can never point at a product page:
/// empty values, fragment-only anchors, non-HTTP schemes and
/// unparseable URLs.
pub fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
