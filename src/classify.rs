//! Destination path derivation from extracted metadata

use crate::metadata::PhotoMetadata;
use std::path::{Path, PathBuf};

/// Folder collecting files without complete classification metadata
pub const UNKNOWN_BUCKET: &str = "UNKNOWN";

/// Outcome of classifying one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Directory the file should be copied into
    pub destination: PathBuf,
    /// False when the file fell back to the UNKNOWN bucket
    pub classified: bool,
}

/// Derive the destination directory for a file from its metadata
///
/// Complete metadata maps to `<root>/<year>/<MM>_<MonthName>/<MODEL>`;
/// anything lacking a capture date or camera model maps to
/// `<root>/UNKNOWN`. Downstream tooling depends on the segment order and
/// the literal underscore join, so the layout is fixed.
pub fn classify(root: &Path, metadata: &PhotoMetadata) -> Classification {
    match (&metadata.date, &metadata.model) {
        (Some(date), Some(model)) => Classification {
            destination: root
                .join(&date.year)
                .join(format!("{}_{}", date.month, date.month_name))
                .join(model),
            classified: true,
        },
        _ => Classification {
            destination: root.join(UNKNOWN_BUCKET),
            classified: false,
        },
    }
}

/// Remove NUL bytes leaked into a path by corrupted metadata strings
///
/// The byte is removed in place; the rest of the path is untouched.
pub fn strip_null_bytes(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.contains('\0') {
        PathBuf::from(raw.replace('\0', ""))
    } else {
        path.to_path_buf()
    }
}
