//! Snapshot data files.
//!
//! An export is persisted as two JavaScript files so that the viewer page can
//! load them with plain `<script>` tags, including from `file://` URLs where
//! `fetch()` is not allowed:
//!
//! - `books.js` assigns `{"books": [...]}` to `booksLibraryData` (core fields),
//! - `metadata.js` assigns `{"<uuid>": {...}}` to `bookMetadata` (extended fields).
//!
//! Each file is a comment line, a single `const` assignment of pretty-printed
//! JSON, and a trailing semicolon.

use crate::error::{ErrorKind, Result};
use crate::models::{Book, Extended};
use exn::{OptionExt, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::Path;
use tracing::instrument;

/// File name of the core book list.
pub const BOOKS_FILE: &str = "books.js";
/// File name of the extended metadata map.
pub const METADATA_FILE: &str = "metadata.js";
/// Directory (relative to the export root) holding cover images.
pub const COVERS_DIR: &str = "covers";

const BOOKS_VARIABLE: &str = "booksLibraryData";
const BOOKS_COMMENT: &str = "// Book library data";
const METADATA_VARIABLE: &str = "bookMetadata";
const METADATA_COMMENT: &str = "// Book metadata extracted from Calibre";

#[derive(Serialize)]
struct BookListRef<'a> {
    books: &'a [Book],
}

#[derive(Deserialize)]
struct BookList {
    books: Vec<Book>,
}

/// The full content of one export: the ordered core list plus extended
/// metadata keyed by book identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    pub metadata: BTreeMap<String, Extended>,
}
impl Snapshot {
    pub fn new(books: Vec<Book>, metadata: BTreeMap<String, Extended>) -> Self {
        Self { books, metadata }
    }

    /// Extended metadata for a book, if any was exported.
    pub fn extended(&self, book: &Book) -> Option<&Extended> {
        self.metadata.get(&book.uuid)
    }

    /// Writes the core book list in its data file format.
    pub fn write_books(&self, w: &mut impl Write) -> std::io::Result<()> {
        write_assignment(w, BOOKS_COMMENT, BOOKS_VARIABLE, &BookListRef { books: &self.books })
    }

    /// Writes the extended metadata map in its data file format.
    pub fn write_metadata(&self, w: &mut impl Write) -> std::io::Result<()> {
        write_assignment(w, METADATA_COMMENT, METADATA_VARIABLE, &self.metadata)
    }

    /// Parses the contents of both data files.
    ///
    /// The core list is required. Extended metadata is optional: when it is
    /// `None` the snapshot simply has no extended fields.
    pub fn parse(books: &str, metadata: Option<&str>) -> Result<Self> {
        let json = unwrap_assignment(books, BOOKS_VARIABLE)
            .ok_or_raise(|| ErrorKind::Malformed(BOOKS_FILE.to_string()))?;
        let list: BookList = serde_json::from_str(json).or_raise(|| ErrorKind::Malformed(BOOKS_FILE.to_string()))?;
        let metadata = match metadata {
            Some(source) => {
                let json = unwrap_assignment(source, METADATA_VARIABLE)
                    .ok_or_raise(|| ErrorKind::Malformed(METADATA_FILE.to_string()))?;
                serde_json::from_str(json).or_raise(|| ErrorKind::Malformed(METADATA_FILE.to_string()))?
            },
            None => BTreeMap::new(),
        };
        Ok(Self { books: list.books, metadata })
    }

    /// Loads a snapshot from an export directory.
    ///
    /// A missing or broken `books.js` is an error. A missing or broken
    /// `metadata.js` only loses the extended fields, and is logged.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let books = read_data_file(dir, BOOKS_FILE)?
            .ok_or_raise(|| ErrorKind::NotFound(dir.join(BOOKS_FILE).display().to_string()))?;
        let metadata = match read_data_file(dir, METADATA_FILE) {
            Ok(Some(m)) => Some(m),
            Ok(None) => {
                tracing::warn!(file = METADATA_FILE, "Extended metadata not found; continuing without it");
                None
            },
            Err(e) => {
                tracing::warn!(file = METADATA_FILE, error = ?e, "Extended metadata unreadable; continuing without it");
                None
            },
        };
        match Self::parse(&books, metadata.as_deref()) {
            Ok(snapshot) => Ok(snapshot),
            // Only the extended half failed; keep the core list.
            Err(e) if matches!(&*e, ErrorKind::Malformed(f) if f == METADATA_FILE) => {
                tracing::warn!(file = METADATA_FILE, "Extended metadata malformed; continuing without it");
                Self::parse(&books, None)
            },
            Err(e) => Err(e),
        }
    }
}

fn read_data_file(dir: &Path, name: &str) -> Result<Option<String>> {
    match std::fs::read_to_string(dir.join(name)) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).or_raise(|| ErrorKind::Io(name.to_string())),
    }
}

fn write_assignment<T: Serialize + ?Sized>(
    w: &mut impl Write,
    comment: &str,
    variable: &str,
    value: &T,
) -> std::io::Result<()> {
    writeln!(w, "{comment}")?;
    write!(w, "const {variable} = ")?;
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w, ";")?;
    w.flush()
}

/// Extracts the JSON right-hand side of `const <variable> = <json>;`.
fn unwrap_assignment<'a>(source: &'a str, variable: &str) -> Option<&'a str> {
    let needle = format!("const {variable}");
    let start = source.find(&needle)? + needle.len();
    let rest = source[start..].trim_start().strip_prefix('=')?;
    let rest = rest.trim_end();
    Some(rest.strip_suffix(';').unwrap_or(rest).trim())
}
