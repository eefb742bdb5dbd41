//! The catalog view: explicit view state fed into pure functions.
//!
//! Nothing here touches the filesystem except [`Catalog::open`]. Everything
//! else takes the loaded data plus a [`ViewState`] and derives what to show,
//! which is what lets the viewer be tested without a browser.
//!
//! ```
//! use shelf_catalog::view::{Catalog, Sort, SortField, ViewState, render};
//! use shelf_catalog::Snapshot;
//!
//! let catalog = Catalog::from(Snapshot::default());
//! let state = ViewState::default().with_query("dune").with_sort(Sort::ascending(SortField::Title));
//! let table = render(&catalog, &state);
//! assert!(table.rows.is_empty());
//! ```

mod columns;
mod filter;
mod sort;
mod table;

pub use self::columns::{Column, Columns};
pub use self::filter::filter;
pub use self::sort::{Direction, Sort, SortField, sort};
pub use self::table::{Cell, Cover, Row, Table, render};

use crate::Snapshot;
use crate::models::Book;
use std::path::Path;

/// Everything the user can change about the view. Resets to the default on
/// every load; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: String,
    /// `None` keeps the export order.
    pub sort: Option<Sort>,
    pub columns: Columns,
}
impl ViewState {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<Option<Sort>>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Clicking a column heading: sort by that field ascending, or flip the
    /// direction if it is already the active sort field.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(current) if current.field == field => Sort::new(field, current.direction.reversed()),
            _ => Sort::ascending(field),
        });
    }
}

/// A loaded snapshot, or the reason it could not be loaded.
#[derive(Debug, Clone)]
pub enum Catalog {
    Ready(Snapshot),
    Failed(String),
}
impl Catalog {
    /// Loads an export directory. Never fails: problems become
    /// [`Catalog::Failed`], which renders as an empty table with a notice.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        match Snapshot::load(dir) {
            Ok(snapshot) => Self::Ready(snapshot),
            Err(e) => {
                tracing::warn!(error = ?e, "Unable to load catalog");
                Self::Failed((*e).to_string())
            },
        }
    }

    pub fn books(&self) -> &[Book] {
        match self {
            Self::Ready(snapshot) => &snapshot.books,
            Self::Failed(_) => &[],
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            Self::Failed(_) => None,
        }
    }
}
impl From<Snapshot> for Catalog {
    fn from(snapshot: Snapshot) -> Self {
        Self::Ready(snapshot)
    }
}

/// Filters then sorts, returning the books to display in order.
pub fn visible<'a>(books: &'a [Book], state: &ViewState) -> Vec<&'a Book> {
    let mut found = filter(books, &state.query);
    if let Some(order) = state.sort {
        sort(&mut found, order);
    }
    found
}
