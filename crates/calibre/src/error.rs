//! Calibre Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A Calibre error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for Calibre operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Install Calibre, or point at the executable explicitly.
    #[display("calibredb not detected on your system; install Calibre or specify its path")]
    CalibredbNotFound,
    /// The executable exists but could not be started.
    #[display("unable to run calibredb: {}", _0.display())]
    NotExecutable(#[error(not(source))] PathBuf),
    /// calibredb ran and reported failure.
    #[display("calibredb exited with {}: {stderr}", code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    CalibredbFailed {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Whatever calibredb printed to stderr.
        stderr: String,
    },
    /// calibredb printed something that is not the expected JSON.
    #[display("unexpected output from calibredb")]
    InvalidOutput,
    /// The given directory is not a Calibre library.
    #[display("not a Calibre library (no metadata.db): {}", _0.display())]
    NotALibrary(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // calibredb refuses to run while the GUI holds the library lock.
        matches!(self, Self::CalibredbFailed { .. })
    }
}
