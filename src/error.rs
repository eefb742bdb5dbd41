//! Command-line Error Types

use derive_more::{Display, Error};

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of a command failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not set up calibredb")]
    Calibre,
    #[display("export failed")]
    Export,
    #[display("could not open the catalog")]
    Viewer,
    #[display("could not write output")]
    Output,
}
