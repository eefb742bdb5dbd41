//! Reading book records from a Calibre library.
//!
//! Calibre's database is never opened directly: all reads go through Calibre's
//! own `calibredb` command-line tool, wrapped by [`Calibredb`]. Consumers only
//! depend on the [`Library`] trait so that tests (and any future source of
//! records) can substitute their own implementation.

mod calibredb;
pub mod error;
mod library;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod record;

pub use crate::calibredb::Calibredb;
use crate::error::Result;
pub use crate::library::{find_default_library, is_library};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockLibrary;
pub use crate::record::{DEFAULT_FIELDS, Record};

/// A source of book records.
pub trait Library {
    /// Every book in the library. Environment problems (missing tool, bad
    /// library path, unreadable output) are errors; problems with individual
    /// records are not, and such records are skipped or trimmed instead.
    fn records(&self) -> Result<Vec<Record>>;
}
