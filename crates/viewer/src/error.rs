//! Viewer Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A viewer error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The page was not embedded at build time.
    #[display("asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// The page could not be written into the export directory.
    #[display("could not write viewer page to {}", _0.display())]
    Install(#[error(not(source))] PathBuf),
    /// Nothing on this system knows how to open a web page.
    #[display("no program found to open web pages (tried {})", _0.join(", "))]
    OpenerNotFound(#[error(not(source))] Vec<&'static str>),
    /// The opener exited with a non-zero exit code.
    #[display("{} exited with code: {code:?}", program.display())]
    OpenerFailed {
        program: PathBuf,
        code: Option<i32>,
    },
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OpenerFailed { .. })
    }
}
