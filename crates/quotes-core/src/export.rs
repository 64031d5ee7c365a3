//! JSON export and import of the quote collection.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Quote;

/// Default file name offered for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Render quotes as pretty-printed JSON.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Parse an import payload into trimmed quotes.
///
/// The payload must be a JSON array. Entries that are not objects, or lack a
/// non-empty `text` or `category` string, are dropped. Nothing is returned
/// unless the whole payload parses.
pub fn parse_import(payload: &str) -> Result<Vec<Quote>> {
    let parsed: Value = serde_json::from_str(payload)
        .map_err(|error| Error::InvalidImport(format!("invalid JSON: {error}")))?;

    let Value::Array(entries) = parsed else {
        return Err(Error::InvalidImport("Invalid format.".to_string()));
    };

    Ok(entries.iter().filter_map(entry_to_quote).collect())
}

fn entry_to_quote(entry: &Value) -> Option<Quote> {
    let text = entry.get("text")?.as_str()?;
    let category = entry.get("category")?.as_str()?;
    Quote::parse(text, category).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_json_export_is_pretty() {
        let rendered = render_json_export(&[Quote::new("A", "X")]).unwrap();
        assert_eq!(
            rendered,
            "[\n  {\n    \"text\": \"A\",\n    \"category\": \"X\"\n  }\n]"
        );
    }

    #[test]
    fn parse_import_drops_incomplete_entries() {
        let quotes = parse_import(r#"[{"text":"Q"},{"text":"Q2","category":"C2"}]"#).unwrap();
        assert_eq!(quotes, vec![Quote::new("Q2", "C2")]);
    }

    #[test]
    fn parse_import_trims_and_skips_blank_or_non_string_fields() {
        let quotes = parse_import(
            r#"[
                {"text":"  Spaced  ","category":"  Cat "},
                {"text":"   ","category":"Cat"},
                {"text":"Numeric","category":7},
                "just a string",
                null
            ]"#,
        )
        .unwrap();
        assert_eq!(quotes, vec![Quote::new("Spaced", "Cat")]);
    }

    #[test]
    fn parse_import_rejects_non_array() {
        let error = parse_import(r#"{"text":"A","category":"X"}"#).unwrap_err();
        assert!(matches!(error, Error::InvalidImport(reason) if reason == "Invalid format."));
    }

    #[test]
    fn parse_import_rejects_invalid_json() {
        assert!(matches!(
            parse_import("[{"),
            Err(Error::InvalidImport(_))
        ));
    }

    #[test]
    fn export_then_import_preserves_quotes() {
        let quotes = vec![Quote::new("A", "X"), Quote::new("B", "Y")];
        let rendered = render_json_export(&quotes).unwrap();
        assert_eq!(parse_import(&rendered).unwrap(), quotes);
    }
}
