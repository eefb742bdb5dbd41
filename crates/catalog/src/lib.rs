//! Book catalog models and the logic behind the catalog viewer.
//!
//! - [`models`]: the core [`Book`](models::Book) record and its
//!   [`Extended`](models::Extended) metadata.
//! - [`Snapshot`]: the two data files an export consists of, and how they are
//!   written and read back.
//! - [`view`]: search, sort, column visibility and table rendering over a
//!   loaded snapshot, as pure functions of explicit view state.

pub mod error;
pub mod models;
mod snapshot;
pub mod view;

pub use crate::snapshot::{BOOKS_FILE, COVERS_DIR, METADATA_FILE, Snapshot};
