use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored business card: extracted contact fields plus user-entered
/// annotations. Field order matches the CSV column order on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub company_logo_description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub meeting_context: String,
    pub priorities: String,
    pub personal_notes: String,
    /// RFC 3339 UTC capture timestamp.
    pub captured_at: String,
    /// Filename of the uploaded card photo inside the image directory.
    pub source_image: String,
    /// Filename of the generated summary illustration; empty until
    /// context has been submitted and generation succeeded.
    pub summary_image: String,
    /// Extracted field map re-serialized as JSON, kept for audit/debug.
    pub raw_ocr_json: String,
}

impl CardRecord {
    /// Create a fresh record with a generated id and all fields empty.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            captured_at: Utc::now().to_rfc3339(),
            ..Default::default()
        }
    }

    /// Full name, skipping whichever halves are empty.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        name.trim().to_string()
    }
}

/// User-entered meeting context for a card. All fields optional in the
/// request body; absent keys deserialize to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardContext {
    #[serde(default)]
    pub meeting_context: String,
    #[serde(default)]
    pub priorities: String,
    #[serde(default)]
    pub personal_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_unique_id() {
        let a = CardRecord::new();
        let b = CardRecord::new();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn full_name_skips_empty_halves() {
        let mut record = CardRecord::new();
        record.first_name = "Ada".into();
        assert_eq!(record.full_name(), "Ada");
        record.last_name = "Lovelace".into();
        assert_eq!(record.full_name(), "Ada Lovelace");
    }

    #[test]
    fn context_defaults_missing_keys_to_empty() {
        let ctx: CardContext = serde_json::from_str(r#"{"priorities": "ship it"}"#).unwrap();
        assert_eq!(ctx.meeting_context, "");
        assert_eq!(ctx.priorities, "ship it");
        assert_eq!(ctx.personal_notes, "");
    }
}
