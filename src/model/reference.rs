use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductReference {
    /// Display name of the product; unique within one listing page
    pub name: String,

    /// Address of the product page
    pub url: String,
}

impl ProductReference {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The complete reference set of a gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationResult {
    /// References in discovery order, unique by `(name, url)`
    pub references: Vec<ProductReference>,

    /// Number of listing pages whose references were accepted
    pub pages_iterated: u32,
}

/// Removes repeated `(name, url)` pairs, keeping the first occurrence
pub fn dedup_references(references: Vec<ProductReference>) -> Vec<ProductReference> {
    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|reference| seen.insert((reference.name.clone(), reference.url.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let refs = vec![
            ProductReference::new("a", "https://example.com/a.html"),
            ProductReference::new("b", "https://example.com/b.html"),
            ProductReference::new("a", "https://example.com/a.html"),
            ProductReference::new("c", "https://example.com/c.html"),
        ];

        let deduped = dedup_references(refs);
        let names: Vec<_> = deduped.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_identity_includes_url() {
        let refs = vec![
            ProductReference::new("a", "https://example.com/a.html"),
            ProductReference::new("a", "https://example.com/a-2.html"),
        ];

        assert_eq!(dedup_references(refs).len(), 2);
    }
}
