//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same layout as every other crate in the
//! workspace.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A snapshot data file is missing; run an export first.
    #[display("data file not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// A snapshot data file exists but is not in the expected format.
    #[display("malformed data file: {_0}")]
    Malformed(#[error(not(source))] String),
    /// A data file could not be read or written.
    #[display("I/O error on data file: {_0}")]
    Io(#[error(not(source))] String),
    /// A user-supplied name (column, sort field, direction) is not recognised.
    #[display("unknown {kind}: {value}")]
    Unknown {
        /// What kind of name was being parsed.
        kind: &'static str,
        /// The value that was given.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
