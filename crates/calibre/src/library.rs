//! Locating Calibre libraries on disk.

use directories::UserDirs;
use std::path::{Path, PathBuf};

/// The SQLite database at the root of every Calibre library.
const DATABASE_FILE: &str = "metadata.db";
/// Directory name Calibre's setup wizard suggests.
const LIBRARY_NAME: &str = "Calibre Library";

/// Whether `path` is a directory containing a Calibre database.
pub fn is_library(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    path.is_dir() && path.join(DATABASE_FILE).is_file()
}

/// Looks for a library in the places Calibre's setup wizard puts one.
///
/// Returns `None` when no candidate holds a `metadata.db`; calibredb then
/// falls back to whichever library Calibre was last pointed at.
pub fn find_default_library() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    find_library_in(dirs.home_dir(), dirs.document_dir())
}

fn find_library_in(home: &Path, documents: Option<&Path>) -> Option<PathBuf> {
    let documents = documents.map(Path::to_path_buf).unwrap_or_else(|| home.join("Documents"));
    let candidates = [
        home.join(LIBRARY_NAME),
        documents.join(LIBRARY_NAME),
        home.join("Books").join(LIBRARY_NAME),
        home.join("calibre"),
    ];
    let found = candidates.into_iter().find(|candidate| is_library(candidate));
    match &found {
        Some(path) => tracing::info!(library = %path.display(), "Auto-detected Calibre library"),
        None => tracing::debug!(home = %home.display(), "No Calibre library found in the usual places"),
    }
    found
}
