use serde::{Deserialize, Serialize};

/// Structured product record extracted from a single product page
///
/// Serialized with the field names the surrounding application expects
/// (`tagId` in camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product name, taken from the reference that led to the page
    pub name: String,

    /// `#`-prefixed numeric tag printed on the page
    pub tag_id: String,

    /// Full-resolution carousel images followed by the featured image
    pub images: Vec<String>,

    /// Product URL with everything from `.html` onwards removed
    pub link: String,

    /// Whitespace-normalized description, empty when the page has none
    pub description: String,
}

impl ProductRecord {
    /// Returns true if the record has no more than `threshold` images
    pub fn is_sparse(&self, threshold: usize) -> bool {
        self.images.len() <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_tag_id_in_camel_case() {
        let record = ProductRecord {
            name: "Sunset".to_string(),
            tag_id: "#42".to_string(),
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
            link: "https://example.com/sunset".to_string(),
            description: String::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tagId"], "#42");
        assert!(json.get("tag_id").is_none());
        assert!(record.is_sparse(4));
        assert!(!record.is_sparse(0));
    }
}
