//! Capture-time derivation from embedded image metadata.
//!
//! Reads the EXIF date-time tags in preference order and normalizes to
//! UTC; any failure along the way falls back to the current time.

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{Field, In, Reader, Tag, Value};

/// EXIF stores timestamps as `YYYY:MM:DD HH:MM:SS` with no zone.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

const DATETIME_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Best-effort capture time for an uploaded image.
pub fn capture_time(image_bytes: &[u8]) -> DateTime<Utc> {
    read_exif_capture_time(image_bytes).unwrap_or_else(Utc::now)
}

fn read_exif_capture_time(image_bytes: &[u8]) -> Option<DateTime<Utc>> {
    let mut cursor = std::io::Cursor::new(image_bytes);
    let exif = Reader::new().read_from_container(&mut cursor).ok()?;
    DATETIME_TAGS.iter().find_map(|tag| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        parse_exif_datetime(&ascii_value(field)?)
    })
}

fn ascii_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(chunks) => chunks.first().map(|chunk| {
            String::from_utf8_lossy(chunk)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

fn parse_exif_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, EXIF_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exif_datetime_as_utc() {
        let parsed = parse_exif_datetime("2024:03:01 12:30:45").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T12:30:45+00:00");
    }

    #[test]
    fn rejects_other_datetime_shapes() {
        assert!(parse_exif_datetime("2024-03-01 12:30:45").is_none());
        assert!(parse_exif_datetime("yesterday").is_none());
        assert!(parse_exif_datetime("").is_none());
    }

    #[test]
    fn falls_back_to_now_without_metadata() {
        let before = Utc::now();
        // A PNG header carries no EXIF container.
        let captured = capture_time(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let after = Utc::now();
        assert!(captured >= before && captured <= after);
    }

    #[test]
    fn falls_back_to_now_for_garbage_bytes() {
        let before = Utc::now();
        let captured = capture_time(b"definitely not an image");
        assert!(captured >= before);
    }
}
