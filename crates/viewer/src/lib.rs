//! The browsable side of an export: a self-contained HTML page that is
//! installed next to the data files, and a launcher that opens it.

mod assets;
pub mod error;
mod page;
mod shell;

pub use crate::assets::PAGE_FILE;
pub use crate::page::Page;
pub use crate::shell::{Opener, Shown, show};
