//! CSV-backed card record store.
//!
//! One row per card, keyed by id. Every write rewrites the entire backing
//! file from the full in-memory set of records. Writers are not
//! coordinated; concurrent updates can race and lose data.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use cardforge_core::{CardError, CardRecord};

/// CSV column order, matching the field order of [`CardRecord`].
const COLUMNS: [&str; 15] = [
    "id",
    "first_name",
    "last_name",
    "company",
    "company_logo_description",
    "email",
    "phone",
    "address",
    "meeting_context",
    "priorities",
    "personal_notes",
    "captured_at",
    "source_image",
    "summary_image",
    "raw_ocr_json",
];

/// Flat-file store of card records.
pub struct CardStore {
    path: PathBuf,
}

impl CardStore {
    /// Open the store, creating parent directories and a header-only file
    /// when the backing file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CardError> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            if let Some(parent) = store.path.parent() {
                std::fs::create_dir_all(parent).map_err(storage_err)?;
            }
            store.rewrite(&[])?;
            info!(path = %store.path.display(), "Created card store");
        }
        Ok(store)
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records from the backing file.
    pub fn list(&self) -> Result<Vec<CardRecord>, CardError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(storage_err)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row.map_err(storage_err)?);
        }
        Ok(records)
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &str) -> Result<Option<CardRecord>, CardError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Append a new record.
    pub fn append(&self, record: CardRecord) -> Result<(), CardError> {
        let mut records = self.list()?;
        debug!(id = %record.id, "Appending card record");
        records.push(record);
        self.rewrite(&records)
    }

    /// Apply `f` to the record with the given id, persist, and return the
    /// updated record. The id itself is never changed.
    pub fn update<F>(&self, id: &str, f: F) -> Result<CardRecord, CardError>
    where
        F: FnOnce(&mut CardRecord),
    {
        let mut records = self.list()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Err(CardError::NotFound(id.to_string()));
        };
        f(record);
        record.id = id.to_string();
        let updated = record.clone();
        self.rewrite(&records)?;
        debug!(id = %id, "Updated card record");
        Ok(updated)
    }

    /// Rewrite the whole backing file from the given records, via a temp
    /// file + rename.
    fn rewrite(&self, records: &[CardRecord]) -> Result<(), CardError> {
        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)
                .map_err(storage_err)?;
            writer.write_record(COLUMNS).map_err(storage_err)?;
            for record in records {
                writer.serialize(record).map_err(storage_err)?;
            }
            writer.flush().map_err(storage_err)?;
        }
        std::fs::rename(&tmp_path, &self.path).map_err(storage_err)
    }
}

fn storage_err(e: impl Display) -> CardError {
    CardError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: &str) -> CardRecord {
        CardRecord {
            id: id.to_string(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            company: "Navy".into(),
            email: "grace@example.com".into(),
            captured_at: "2024-01-01T00:00:00+00:00".into(),
            raw_ocr_json: r#"{"first_name":"Grace"}"#.into(),
            ..Default::default()
        }
    }

    #[test]
    fn open_creates_header_only_file() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        assert!(store.path().exists());
        assert!(store.list().unwrap().is_empty());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("id,first_name,last_name"));
    }

    #[test]
    fn append_then_list_round_trips() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        store.append(sample("a")).unwrap();
        store.append(sample("b")).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], sample("a"));
        assert_eq!(records[1], sample("b"));
    }

    #[test]
    fn round_trips_commas_and_newlines() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        let mut record = sample("quoted");
        record.address = "1 Main St, Suite 5\nSpringfield".into();
        record.personal_notes = "said \"hello\"".into();
        store.append(record.clone()).unwrap();

        assert_eq!(store.get("quoted").unwrap().unwrap(), record);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        store.append(sample("a")).unwrap();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn update_mutates_and_persists() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        store.append(sample("a")).unwrap();

        let updated = store
            .update("a", |r| {
                r.meeting_context = "conference booth".into();
                r.summary_image = "a_summary.png".into();
            })
            .unwrap();
        assert_eq!(updated.meeting_context, "conference booth");

        let reloaded = store.get("a").unwrap().unwrap();
        assert_eq!(reloaded.summary_image, "a_summary.png");
        assert_eq!(reloaded.first_name, "Grace");
    }

    #[test]
    fn update_cannot_change_id() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        store.append(sample("a")).unwrap();

        let updated = store.update("a", |r| r.id = "tampered".into()).unwrap();
        assert_eq!(updated.id, "a");
        assert!(store.get("a").unwrap().is_some());
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = CardStore::open(dir.path().join("cards.csv")).unwrap();
        store.append(sample("a")).unwrap();

        let err = store.update("missing", |r| r.company = "Acme".into()).unwrap_err();
        assert!(matches!(err, CardError::NotFound(_)));
        // File untouched.
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.get("a").unwrap().unwrap().company, "Navy");
    }
}
