//! Exporting a library as a static catalog snapshot.
//!
//! An export directory holds everything the viewer page needs, and nothing
//! else:
//!
//! ```text
//! output/
//! ├── books.html      the viewer page
//! ├── books.js        core book list
//! ├── metadata.js     extended metadata, keyed by book identifier
//! └── covers/
//!     └── <uuid>.jpg
//! ```
//!
//! Every run replaces the previous snapshot in full. Two runs over an
//! unchanged library produce byte-identical data files.

mod covers;
pub mod error;
mod path;
mod transform;
mod write;

pub use crate::covers::CoverStats;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shelf_calibre::Library;
use shelf_catalog::{BOOKS_FILE, METADATA_FILE};
use shelf_viewer::Page;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "output";

/// Configures and runs one export.
///
/// # Example
///
/// ```no_run
/// use shelf_calibre::Calibredb;
/// use shelf_export::Exporter;
/// # fn export() -> shelf_export::error::Result<()> {
/// # let calibredb = Calibredb::new("calibredb");
/// let summary = Exporter::new(&calibredb, "output").with_limit(Some(50)).run()?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct Exporter<'a> {
    library: &'a dyn Library,
    output: PathBuf,
    covers: bool,
    limit: Option<usize>,
    viewer: bool,
}
impl<'a> Exporter<'a> {
    pub fn new(library: &'a dyn Library, output: impl Into<PathBuf>) -> Self {
        Self { library, output: output.into(), covers: true, limit: None, viewer: true }
    }

    /// Whether to copy cover images. When disabled every book has no cover
    /// and any previously exported covers are removed.
    pub fn with_covers(mut self, covers: bool) -> Self {
        self.covers = covers;
        self
    }

    /// Export only the first `limit` books, by ascending Calibre ID.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Whether to install the viewer page next to the data files.
    pub fn with_viewer(mut self, viewer: bool) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    #[instrument(skip_all, fields(output = %self.output.display(), limit = ?self.limit))]
    pub fn run(&self) -> Result<Summary> {
        let mut records = self.library.records().or_raise(|| ErrorKind::Library)?;
        records.sort_by_key(|r| r.id);
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        transform::assign_identifiers(&mut records);

        std::fs::create_dir_all(&self.output).or_raise(|| ErrorKind::OutputDir(self.output.clone()))?;

        let mut stats = CoverStats::default();
        let covers = match self.covers {
            true => covers::export(&self.output, &records, &mut stats)?,
            false => HashMap::new(),
        };
        let snapshot = transform::snapshot(&records, &covers);

        write::atomically(&self.output, METADATA_FILE, |w| snapshot.write_metadata(w))?;
        write::atomically(&self.output, BOOKS_FILE, |w| snapshot.write_books(w))?;

        let viewer = match self.viewer {
            true => match Page::install(&self.output) {
                Ok(page) => Some(page),
                Err(e) => {
                    tracing::warn!(error = ?e, "Could not install viewer page; data files were still written");
                    None
                },
            },
            false => None,
        };

        stats.pruned = covers::prune(&self.output, &covers);
        let summary = Summary { output: self.output.clone(), books: snapshot.books.len(), covers: stats, viewer };
        tracing::info!(
            books = summary.books,
            covers = stats.copied,
            missing = stats.missing,
            failed = stats.failed,
            pruned = stats.pruned,
            "Export complete"
        );
        Ok(summary)
    }
}

/// The outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub output: PathBuf,
    /// Number of books written
    pub books: usize,
    pub covers: CoverStats,
    /// The installed viewer page, unless installing it was skipped or failed
    pub viewer: Option<PathBuf>,
}
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exported {} books to {}", self.books, self.output.display())?;
        write!(f, "Covers: {} copied, {} missing", self.covers.copied, self.covers.missing)?;
        if self.covers.failed > 0 {
            write!(f, ", {} failed", self.covers.failed)?;
        }
        if self.covers.pruned > 0 {
            write!(f, ", {} stale removed", self.covers.pruned)?;
        }
        match &self.viewer {
            Some(page) => write!(f, "\nOpen {} in a browser to view the catalog", page.display()),
            None => Ok(()),
        }
    }
}
