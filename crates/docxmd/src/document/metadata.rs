//! Metadata footer appended to processed documents.
//!
//! The footer is a JSON object inside an HTML comment so that it survives
//! Markdown rendering and the Pandoc round trip back to DOCX:
//!
//! ```text
//! <!-- METADATA
//! { "created_at": "...", "generator": "docxmd", ... }
//! -->
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FOOTER_MARKER: &str = "<!-- METADATA";
const FOOTER_END: &str = "-->";
pub const GENERATOR: &str = "docxmd";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub generator: String,
    pub generator_version: String,
    /// Slug of the detected [`DocumentType`](crate::patterns::DocumentType).
    pub document_type: String,
    pub confidence: f64,
    pub position: String,
    pub department: String,
    pub quality_bucket: String,
    pub overall_score: f64,
}

impl DocumentMetadata {
    /// Keeps the creation time of an earlier run, if there was one.
    pub fn carry_over(mut self, previous: Option<&DocumentMetadata>) -> Self {
        if let Some(previous) = previous {
            self.created_at = previous.created_at;
        }
        self
    }
}

pub fn is_already_processed(text: &str) -> bool {
    text.contains(FOOTER_MARKER)
}

/// Document body without the footer and anything after it.
pub fn strip_footer(text: &str) -> &str {
    match text.find(FOOTER_MARKER) {
        Some(idx) => text[..idx].trim_end(),
        None => text,
    }
}

/// Parses the footer, if present and well-formed. A footer written by an
/// older tool with a different field set yields `None`.
pub fn parse_footer(text: &str) -> Option<DocumentMetadata> {
    let start = text.find(FOOTER_MARKER)? + FOOTER_MARKER.len();
    let rest = &text[start..];
    let end = rest.find(FOOTER_END)?;
    serde_json::from_str(rest[..end].trim()).ok()
}

pub fn render_footer(metadata: &DocumentMetadata) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(metadata)?;
    Ok(format!("{}\n{}\n{}", FOOTER_MARKER, json, FOOTER_END))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn metadata() -> DocumentMetadata {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        DocumentMetadata {
            created_at: at,
            updated_at: at,
            generator: GENERATOR.to_string(),
            generator_version: "0.1.0".to_string(),
            document_type: "job_description".to_string(),
            confidence: 0.45,
            position: "бухгалтер".to_string(),
            department: "бухгалтерия".to_string(),
            quality_bucket: "high".to_string(),
            overall_score: 0.82,
        }
    }

    #[test]
    fn test_footer_is_parsed_back() {
        let footer = render_footer(&metadata()).unwrap();
        let document = format!("# Заголовок\n\nТекст.\n\n{}\n", footer);

        assert!(is_already_processed(&document));
        assert_eq!(parse_footer(&document), Some(metadata()));
        assert_eq!(strip_footer(&document), "# Заголовок\n\nТекст.");
    }

    #[test]
    fn test_plain_document_has_no_footer() {
        let text = "# Заголовок\n\nТекст.";
        assert!(!is_already_processed(text));
        assert_eq!(parse_footer(text), None);
        assert_eq!(strip_footer(text), text);
    }

    #[test]
    fn test_foreign_footer_is_detected_but_not_parsed() {
        let text = "Текст\n\n<!-- METADATA\n{\"author\": \"docxmd_processor\"}\n-->";
        assert!(is_already_processed(text));
        assert_eq!(parse_footer(text), None);
        assert_eq!(strip_footer(text), "Текст");
    }

    #[test]
    fn test_carry_over_keeps_creation_time() {
        let previous = metadata();
        let mut next = metadata();
        next.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        next.updated_at = next.created_at;

        let merged = next.clone().carry_over(Some(&previous));
        assert_eq!(merged.created_at, previous.created_at);
        assert_eq!(merged.updated_at, next.updated_at);
    }
}
