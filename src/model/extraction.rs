/// Outcome of extracting one optional field from a page
///
/// Layout rules never fail on a missing element; they report `Absent`
/// and the caller decides whether that is acceptable for the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// The field was present in the document
    Found(T),

    /// No matching element (or no usable value) was present
    Absent,
}

impl<T> Extraction<T> {
    /// Returns true if the field was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into an `Option`, mapping `Absent` to `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Applies `f` to a found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
        match self {
            Self::Found(value) => Extraction::Found(f(value)),
            Self::Absent => Extraction::Absent,
        }
    }
}

impl<T: Default> Extraction<T> {
    /// Returns the found value or the type's empty value
    pub fn unwrap_or_empty(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Extraction<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Found(v),
            None => Self::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        assert_eq!(Extraction::from(Some(3)), Extraction::Found(3));
        assert_eq!(Extraction::<i32>::from(None), Extraction::Absent);
    }

    #[test]
    fn test_absent_resolves_to_empty() {
        let absent: Extraction<String> = Extraction::Absent;
        assert!(!absent.is_found());
        assert_eq!(absent.unwrap_or_empty(), "");

        let found = Extraction::Found("text".to_string()).map(|s| s.to_uppercase());
        assert_eq!(found.unwrap_or_empty(), "TEXT");
    }
}
