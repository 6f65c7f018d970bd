//! Best-effort JSON recovery from model output.
//!
//! Models asked for strict JSON still sometimes wrap it in code fences or
//! prose. The parser strips fences (with or without a language tag) and
//! slices from the first `{` to the last `}` before deserializing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Contact fields extracted from a card image. Missing keys deserialize
/// to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub company_logo_description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl ExtractedFields {
    /// Serialize back to JSON for the audit column.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Recover a JSON object from free-form model text.
pub fn parse_json_blob(text: &str) -> Result<ExtractedFields> {
    let mut cleaned = text.trim().to_string();

    if cleaned.contains("```") {
        let parts: Vec<&str> = cleaned.split("```").collect();
        cleaned = if parts.len() >= 3 {
            // Fenced block: take the inside of the first fence pair.
            parts[1].to_string()
        } else {
            parts.concat()
        };
    }
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_prefix("json").unwrap_or(cleaned);

    // Slice the first top-level object out of any surrounding prose.
    let cleaned = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    };

    serde_json::from_str(cleaned).context("Model output did not contain a JSON object")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let fields = parse_json_blob(r#"{"first_name": "Ada", "email": "ada@example.com"}"#)
            .unwrap();
        assert_eq!(fields.first_name, "Ada");
        assert_eq!(fields.email, "ada@example.com");
        assert_eq!(fields.phone, "");
    }

    #[test]
    fn parses_fenced_json_with_language_tag() {
        let text = "```json\n{\"first_name\": \"Ada\", \"company\": \"Analytical Engines\"}\n```";
        let fields = parse_json_blob(text).unwrap();
        assert_eq!(fields.company, "Analytical Engines");
    }

    #[test]
    fn parses_fenced_json_without_language_tag() {
        let text = "```\n{\"last_name\": \"Lovelace\"}\n```";
        let fields = parse_json_blob(text).unwrap();
        assert_eq!(fields.last_name, "Lovelace");
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let text = "Here are the extracted details: {\"phone\": \"+1 555 0100\"} Let me know!";
        let fields = parse_json_blob(text).unwrap();
        assert_eq!(fields.phone, "+1 555 0100");
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let fields = parse_json_blob("{}").unwrap();
        assert_eq!(fields, ExtractedFields::default());
    }

    #[test]
    fn rejects_text_without_object() {
        assert!(parse_json_blob("sorry, I cannot read this card").is_err());
    }

    #[test]
    fn to_json_round_trips() {
        let fields = ExtractedFields {
            first_name: "Ada".into(),
            ..Default::default()
        };
        let json = fields.to_json();
        assert_eq!(parse_json_blob(&json).unwrap(), fields);
    }
}
