//! File naming inside the export directory.
//!
//! Book identifiers become file names in `covers/`, so they must be a single
//! plain path component: no separators, no traversal, no null bytes.

use shelf_catalog::COVERS_DIR;
use std::path::{Component, Path};

/// Extension used when the source cover has none we can use.
const DEFAULT_COVER_EXTENSION: &str = "jpg";

/// Whether `name` can be used as-is as a file name inside the export.
pub(crate) fn is_file_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') || name.contains('\0') {
        return false;
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) => component == name,
        _ => false,
    }
}

/// Lower-cased extension of the source cover, or `jpg`.
pub(crate) fn cover_extension(source: &Path) -> String {
    source
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_COVER_EXTENSION.to_string())
}

/// File name of a book's exported cover.
pub(crate) fn cover_file_name(uuid: &str, source: &Path) -> String {
    format!("{uuid}.{}", cover_extension(source))
}

/// The cover reference stored in the book list, relative to the export root.
/// Always uses `/` so the viewer page can use it as a URL.
pub(crate) fn cover_reference(file_name: &str) -> String {
    format!("{COVERS_DIR}/{file_name}")
}
