//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A quote in the collection.
///
/// `text` is the natural key and never changes once the quote exists;
/// `category` may be rewritten by a merge or a conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, used as identity
    pub text: String,
    /// Category label
    pub category: String,
}

impl Quote {
    /// Create a quote verbatim, without trimming or validation
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Build a quote from user input, trimming both fields.
    ///
    /// Empty text or category (after trimming) is rejected.
    pub fn parse(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("quote text cannot be empty".into()));
        }
        if category.is_empty() {
            return Err(Error::InvalidInput("quote category cannot be empty".into()));
        }
        Ok(Self::new(text, category))
    }

    /// Case-insensitive `(text, category)` composite used for de-duplication
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.text.to_lowercase(), self.category.to_lowercase())
    }

    /// Whether both fields carry visible content
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\"", self.category, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_fields() {
        let quote = Quote::parse("  Stay hungry.  ", " Motivation ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Motivation");
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        assert!(matches!(
            Quote::parse("   ", "Motivation"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Quote::parse("Stay hungry.", "\t"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dedup_key_ignores_case() {
        let a = Quote::new("Hello", "World");
        let b = Quote::new("HELLO", "world");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_display() {
        let quote = Quote::new("If you can dream it, you can do it.", "Dreams");
        assert_eq!(
            quote.to_string(),
            "Dreams: \"If you can dream it, you can do it.\""
        );
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&Quote::new("A", "X")).unwrap();
        assert_eq!(json, r#"{"text":"A","category":"X"}"#);
    }
}
