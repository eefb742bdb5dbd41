use crate::error::{ErrorKind, Result};
use crate::path;
use exn::ResultExt;
use shelf_calibre::Record;
use shelf_catalog::COVERS_DIR;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::instrument;

/// What happened to book covers during an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverStats {
    /// Covers copied into the export
    pub copied: usize,
    /// Books with no cover, or whose cover file does not exist
    pub missing: usize,
    /// Covers that exist but could not be copied
    pub failed: usize,
    /// Stale files removed from the cover directory
    pub pruned: usize,
}

/// Copies each record's cover to `covers/<uuid>.<ext>`.
///
/// Returns the cover reference for every book whose cover now exists in the
/// export. A cover that cannot be copied only costs that book its cover.
#[instrument(skip_all, fields(books = records.len()))]
pub(crate) fn export(output: &Path, records: &[Record], stats: &mut CoverStats) -> Result<HashMap<String, String>> {
    let dir = output.join(COVERS_DIR);
    std::fs::create_dir_all(&dir).or_raise(|| ErrorKind::Covers(dir.clone()))?;
    let mut exported = HashMap::with_capacity(records.len());
    for record in records {
        let Some(source) = &record.cover else {
            stats.missing += 1;
            continue;
        };
        if !source.is_file() {
            tracing::warn!(book = record.id, cover = %source.display(), "Cover file not found");
            stats.missing += 1;
            continue;
        }
        let name = path::cover_file_name(&record.uuid, source);
        match std::fs::copy(source, dir.join(&name)) {
            Ok(_) => {
                stats.copied += 1;
                exported.insert(record.uuid.clone(), path::cover_reference(&name));
            },
            Err(e) => {
                tracing::warn!(book = record.id, cover = %source.display(), error = %e, "Could not copy cover");
                stats.failed += 1;
            },
        }
    }
    tracing::info!(copied = stats.copied, missing = stats.missing, failed = stats.failed, "Exported covers");
    Ok(exported)
}

/// Removes every file in the cover directory that is not referenced.
///
/// Returns how many files were removed. Files that cannot be removed are
/// logged and left in place.
pub(crate) fn prune(output: &Path, referenced: &HashMap<String, String>) -> usize {
    let dir = output.join(COVERS_DIR);
    let keep: HashSet<&str> = referenced.values().filter_map(|r| r.rsplit('/').next()).collect();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Could not list cover directory");
            return 0;
        },
    };
    let mut pruned = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| keep.contains(n)) || !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::debug!(file = %entry.path().display(), "Removed stale cover");
                pruned += 1;
            },
            Err(e) => tracing::warn!(file = %entry.path().display(), error = %e, "Could not remove stale cover"),
        }
    }
    pruned
}
