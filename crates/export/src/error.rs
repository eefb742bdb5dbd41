//! Export Error Types
//!
//! Only problems with the environment end up here. Problems with a single
//! book (a cover that cannot be copied, a malformed field) are logged and
//! skipped, and never fail an export.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An export error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Book records could not be read from the library.
    #[display("could not read the library")]
    Library,
    /// The output directory could not be created.
    #[display("could not create output directory {}", _0.display())]
    OutputDir(#[error(not(source))] PathBuf),
    /// The cover directory could not be created.
    #[display("could not create cover directory {}", _0.display())]
    Covers(#[error(not(source))] PathBuf),
    /// A data file could not be written.
    #[display("could not write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Library)
    }
}
