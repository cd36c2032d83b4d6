//! EXIF metadata extraction for images
//!
//! Pulls the capture date, camera model, and GPS position out of a parsed
//! EXIF block. Extraction never fails as a whole: an undecodable or invalid
//! field only leaves that field unset (or substituted, for dates).

use crate::error::{Error, Result};
use chrono::NaiveDate;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{trace, warn};

/// EXIF tags to try for the capture timestamp, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,  // When the original image was taken
    Tag::DateTimeDigitized, // When the image was digitized
    Tag::DateTime,          // File modification date/time
];

/// Capture date split into path-building components
///
/// Either every field is populated (from a parsed timestamp or the fixed
/// fallback) or the whole value is absent; there is no partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDate {
    /// Four-digit year, e.g. "2023"
    pub year: String,
    /// Zero-padded two-digit month, e.g. "07"
    pub month: String,
    /// Zero-padded two-digit day, e.g. "15"
    pub day: String,
    /// Full month name, e.g. "July"
    pub month_name: String,
}

/// GPS position recorded by the camera, in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Metadata extracted from a single image
#[derive(Debug, Clone, Default)]
pub struct PhotoMetadata {
    /// Capture date, if a timestamp tag was present
    pub date: Option<CaptureDate>,
    /// Normalized camera model, if the tag was present
    pub model: Option<String>,
    /// GPS position, informational only
    pub gps: Option<GpsCoordinate>,
}

impl PhotoMetadata {
    /// True when every field needed for classification is present
    ///
    /// GPS data never participates in this gate.
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.model.is_some()
    }
}

/// Read the EXIF block of an image file
pub fn read_metadata(path: &Path) -> Result<exif::Exif> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::MetadataRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Extract capture date, camera model, and GPS position from an EXIF block
pub fn extract(exif: &exif::Exif) -> PhotoMetadata {
    let date = DATE_TAGS
        .iter()
        .find_map(|tag| exif.get_field(*tag, In::PRIMARY))
        .and_then(decode_text)
        .map(|raw| parse_capture_date(&raw));

    let model = exif
        .get_field(Tag::Model, In::PRIMARY)
        .and_then(decode_text)
        .map(|raw| normalize_model(&raw));

    let gps = extract_gps(exif);
    if let Some(position) = gps {
        trace!(
            latitude = position.latitude,
            longitude = position.longitude,
            "Found GPS position"
        );
    }

    PhotoMetadata { date, model, gps }
}

/// Parse a capture timestamp of the conventional form "YYYY:MM:DD HH:MM:SS"
///
/// The year, month, and day substrings are taken by position. Values that do
/// not form a calendar date are substituted with 2000-01-01 rather than
/// discarded, so a malformed timestamp still classifies.
pub fn parse_capture_date(raw: &str) -> CaptureDate {
    let year = raw.get(0..4).unwrap_or("");
    let month = raw.get(5..7).unwrap_or("");
    let day = raw.get(8..10).unwrap_or("");

    let parsed = year
        .parse::<i32>()
        .ok()
        .zip(month.parse::<u32>().ok())
        .zip(day.parse::<u32>().ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d));

    match parsed {
        Some(date) => CaptureDate {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            month_name: date.format("%B").to_string(),
        },
        None => {
            warn!(
                timestamp = raw,
                "Invalid capture date {}-{}-{}, set to 2000-01-01", year, month, day
            );
            CaptureDate {
                year: "2000".to_string(),
                month: "01".to_string(),
                day: "01".to_string(),
                month_name: "January".to_string(),
            }
        }
    }
}

/// Normalize a camera model string: uppercase, spaces become underscores
pub fn normalize_model(raw: &str) -> String {
    raw.to_uppercase().replace(' ', "_")
}

/// Decode a metadata field value to text
///
/// ASCII values are decoded as UTF-8 with trailing NUL/space padding
/// trimmed; a value that cannot be decoded is dropped with a warning so the
/// remaining fields still extract. Other value types go through the
/// library's display form.
fn decode_text(field: &exif::Field) -> Option<String> {
    match &field.value {
        Value::Ascii(chunks) => {
            let bytes: &[u8] = chunks.first().map(|c| c.as_slice()).unwrap_or(&[]);
            match std::str::from_utf8(bytes) {
                Ok(text) => Some(text.trim_end_matches(['\0', ' ']).to_string()),
                Err(_) => {
                    warn!(tag = %field.tag, "Error decoding metadata value as text");
                    None
                }
            }
        }
        _ => Some(field.display_value().to_string()),
    }
}

/// Decode the GPS fields into a coordinate pair, if the camera recorded one
fn extract_gps(exif: &exif::Exif) -> Option<GpsCoordinate> {
    let latitude = gps_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = gps_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    Some(GpsCoordinate {
        latitude,
        longitude,
    })
}

/// Read one GPS coordinate with its hemisphere reference
fn gps_coordinate(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(coord_tag, In::PRIMARY)?;
    let dms = match &field.value {
        Value::Rational(parts) => parts.as_slice(),
        _ => return None,
    };

    let reference = exif.get_field(ref_tag, In::PRIMARY).and_then(decode_text);
    dms_to_decimal(dms, reference.as_deref())
}

/// Convert a degrees/minutes/seconds triple to signed decimal degrees
///
/// Southern and western hemispheres yield negative values.
pub fn dms_to_decimal(dms: &[exif::Rational], reference: Option<&str>) -> Option<f64> {
    if dms.len() < 3 {
        return None;
    }

    let degrees = dms[0].to_f64() + dms[1].to_f64() / 60.0 + dms[2].to_f64() / 3600.0;
    let sign = match reference {
        Some(r) if r.contains('S') || r.contains('W') => -1.0,
        _ => 1.0,
    };

    Some(degrees * sign)
}
