//! Column visibility.

use crate::error::{Error, ErrorKind};
use exn::OptionExt;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A column of the catalog table. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Cover,
    Title,
    Authors,
    Series,
    Tags,
    Date,
    Formats,
    Publisher,
    Languages,
    Rating,
}
impl Column {
    pub const ALL: [Column; 10] = [
        Self::Cover,
        Self::Title,
        Self::Authors,
        Self::Series,
        Self::Tags,
        Self::Date,
        Self::Formats,
        Self::Publisher,
        Self::Languages,
        Self::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Series => "series",
            Self::Tags => "tags",
            Self::Date => "date",
            Self::Formats => "formats",
            Self::Publisher => "publisher",
            Self::Languages => "languages",
            Self::Rating => "rating",
        }
    }

    /// Column heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cover => "Cover",
            Self::Title => "Title",
            Self::Authors => "Author(s)",
            Self::Series => "Series",
            Self::Tags => "Tags",
            Self::Date => "Published",
            Self::Formats => "Formats",
            Self::Publisher => "Publisher",
            Self::Languages => "Language",
            Self::Rating => "Rating",
        }
    }

    /// Whether the column's values live in the extended metadata file.
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Publisher | Self::Languages | Self::Rating)
    }
}
impl FromStr for Column {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let name = match s.as_str() {
            "author" => "authors",
            "language" => "languages",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_raise(|| ErrorKind::Unknown { kind: "column", value: s })
    }
}
impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// The set of visible columns.
///
/// Toggling only changes which cells are produced at render time; the loaded
/// data is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns(BTreeSet<Column>);
impl Default for Columns {
    fn default() -> Self {
        [Column::Cover, Column::Title, Column::Authors, Column::Series, Column::Tags, Column::Date]
            .into_iter()
            .collect()
    }
}
impl FromIterator<Column> for Columns {
    fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl Columns {
    pub fn all() -> Self {
        Column::ALL.into_iter().collect()
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn show(&mut self, column: Column) {
        self.0.insert(column);
    }

    pub fn hide(&mut self, column: Column) {
        self.0.remove(&column);
    }

    /// Flips a column's visibility and returns whether it is now visible.
    pub fn toggle(&mut self, column: Column) -> bool {
        match self.is_visible(column) {
            true => self.hide(column),
            false => self.show(column),
        }
        self.is_visible(column)
    }

    /// Visible columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromStr for Columns {
    type Err = Error;

    /// Parses a comma-separated list such as `"title,authors,rating"`, or
    /// `"all"` for every column.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        s.split(',').filter(|c| !c.trim().is_empty()).map(Column::from_str).collect()
    }
}
