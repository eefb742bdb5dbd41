use super::SeriesPosition;
use serde::{Deserialize, Serialize};

/// Core metadata for one library item: everything the default table view
/// needs. Written to the book list data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Calibre's numeric book ID
    pub id: u64,
    /// Identifier unique within one export; cover files are named after it
    pub uuid: String,
    pub title: String,
    /// Authors in display order (may be empty)
    #[serde(default)]
    pub authors: Vec<String>,
    /// Calibre's author sort string, e.g. "Pratchett, Terry"
    #[serde(default)]
    pub author_sort: Option<String>,
    #[serde(default)]
    pub series: Option<SeriesPosition>,
    /// Tags, de-duplicated, in library order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication date as `YYYY-MM-DD`
    #[serde(default)]
    pub pubdate: Option<String>,
    /// Upper-case format names, e.g. `EPUB`
    #[serde(default)]
    pub formats: Vec<String>,
    /// Path of the cover image relative to the export directory, if one was
    /// exported. Never points at a missing file.
    #[serde(default)]
    pub cover: Option<String>,
}
impl Book {
    /// Author names joined for display.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// The key used when sorting by author: the author sort string when
    /// Calibre has one, otherwise the first listed author.
    pub fn author_key(&self) -> Option<&str> {
        self.author_sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.authors.first().map(String::as_str))
    }
}
impl AsRef<Book> for Book {
    fn as_ref(&self) -> &Book {
        self
    }
}
