//! In-memory [`Library`] for tests in dependent crates.

use crate::error::{ErrorKind, Result};
use crate::{Library, Record};

/// A library that returns a fixed set of records, or always fails.
#[derive(Debug, Clone, Default)]
pub struct MockLibrary {
    records: Vec<Record>,
    unavailable: bool,
}
impl MockLibrary {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self { records: records.into_iter().collect(), unavailable: false }
    }

    /// A library whose reads fail as if calibredb were missing.
    pub fn unavailable() -> Self {
        Self { records: vec![], unavailable: true }
    }
}
impl Library for MockLibrary {
    fn records(&self) -> Result<Vec<Record>> {
        if self.unavailable {
            exn::bail!(ErrorKind::CalibredbNotFound);
        }
        Ok(self.records.clone())
    }
}
