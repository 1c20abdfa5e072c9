//! Capture metadata carried alongside the preview.

use std::io::Cursor;

use exif::{DateTime, Exif, In, Reader, Tag, Value};
use log::debug;

use crate::decode::{orientation_from_exif, Orientation};

/// Metadata reported for a processed raw file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawMetadata {
    pub orientation: Orientation,
    /// Creation time as ISO 8601 (`YYYY-MM-DDTHH:MM:SS`), camera local time.
    pub create_date: Option<String>,
}

/// Read orientation and creation date from the file's EXIF data.
///
/// Missing or malformed metadata is not an error; the fields fall back to
/// `Orientation::Normal` and `None`.
pub(crate) fn read_metadata(bytes: &[u8]) -> RawMetadata {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => RawMetadata {
            orientation: orientation_from_exif(&exif),
            create_date: create_date(&exif),
        },
        Err(e) => {
            debug!("no exif metadata: {}", e);
            RawMetadata::default()
        }
    }
}

fn create_date(exif: &Exif) -> Option<String> {
    [Tag::DateTimeDigitized, Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .find_map(|tag| date_field(exif, tag))
        .map(|dt| format_iso8601(&dt))
}

fn date_field(exif: &Exif, tag: Tag) -> Option<DateTime> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) => DateTime::from_ascii(values.first()?).ok(),
        _ => None,
    }
}

fn format_iso8601(dt: &DateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
    )
}
