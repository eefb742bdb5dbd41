//! Sorting by a chosen field.

use crate::error::{Error, ErrorKind};
use crate::models::Book;
use exn::OptionExt;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A field the catalog can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Author,
    /// Series name, then position within the series
    Series,
    /// Publication date
    Date,
}
impl SortField {
    pub const ALL: [SortField; 4] = [Self::Title, Self::Author, Self::Series, Self::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Series => "series",
            Self::Date => "date",
        }
    }

    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::Author => nones_last(
                a.author_key().map(str::to_lowercase),
                b.author_key().map(str::to_lowercase),
                |x, y| x.cmp(y),
            ),
            Self::Series => nones_last(a.series.as_ref(), b.series.as_ref(), |x, y| x.compare(y)),
            Self::Date => nones_last(a.pubdate.as_deref(), b.pubdate.as_deref(), |x, y| x.cmp(y)),
        }
    }
}
impl FromStr for SortField {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let name = match lower.as_str() {
            "authors" => "author",
            "series_index" => "series",
            "pubdate" | "published" => "date",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or_raise(|| ErrorKind::Unknown { kind: "sort field", value: s.to_string() })
    }
}
impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}
impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}
impl Sort {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, Direction::Descending)
    }
}

/// Sorts `books` in place.
///
/// Ascending order is a stable sort, so ties keep their original relative
/// order. Descending order is the exact reverse of the ascending sequence.
/// Books without a value for the field come last when ascending.
pub fn sort(books: &mut [&Book], sort: Sort) {
    books.sort_by(|a, b| sort.field.compare(a, b));
    if sort.direction == Direction::Descending {
        books.reverse();
    }
}

fn nones_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
