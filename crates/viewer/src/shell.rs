//! Native launcher: hands the installed page to whatever opens web pages on
//! this system.

use crate::error::{ErrorKind, Result};
use crate::page::Page;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// Programs that open a file in the user's default browser, with the
/// arguments that go before the file.
const OPENERS: &[(&str, &[&str])] = &[
    ("xdg-open", &[]),
    ("open", &[]),
    ("gio", &["open"]),
    ("wslview", &[]),
];

/// A program able to open the viewer page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opener {
    program: PathBuf,
    args: Vec<String>,
}
impl Opener {
    /// Uses a specific program, such as a browser.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: vec![] }
    }

    pub fn discover() -> Result<Self> {
        for (exe, args) in OPENERS {
            if let Ok(program) = which::which(exe) {
                tracing::trace!(program = %program.display(), "Discovered page opener");
                return Ok(Self { program, args: args.iter().map(ToString::to_string).collect() });
            }
        }
        exn::bail!(ErrorKind::OpenerNotFound(OPENERS.iter().map(|(exe, _)| *exe).collect()));
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn open(&self, target: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .status()
            .or_raise(|| ErrorKind::Io)?;
        if !status.success() {
            exn::bail!(ErrorKind::OpenerFailed { program: self.program.clone(), code: status.code() });
        }
        Ok(())
    }
}

/// What happened when asked to show a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    /// The page was handed to the opener.
    Opened(PathBuf),
    /// There is no page to show; the message says where it was expected.
    NotFound(String),
}

/// Displays the catalog page installed in `dir`.
///
/// A missing page is not an error: it is reported as [`Shown::NotFound`] so
/// the caller can print it instead of a failure trace.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn show(dir: impl AsRef<Path>, opener: Option<Opener>) -> Result<Shown> {
    let dir = dir.as_ref();
    let Some(page) = Page::locate(dir) else {
        let expected = dir.join(crate::PAGE_FILE);
        tracing::warn!(page = %expected.display(), "Viewer page not found");
        return Ok(Shown::NotFound(format!("Error: books.html not found at {}", expected.display())));
    };
    let page = page.canonicalize().unwrap_or(page);
    let opener = match opener {
        Some(opener) => opener,
        None => Opener::discover()?,
    };
    tracing::info!(page = %page.display(), program = %opener.program().display(), "Opening catalog");
    opener.open(&page)?;
    Ok(Shown::Opened(page))
}
