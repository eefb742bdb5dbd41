use crate::assets::{Assets, PAGE_FILE};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The static catalog page that reads `books.js` and `metadata.js` from its
/// own directory.
pub struct Page;
impl Page {
    /// Raw bytes of the embedded page.
    pub fn contents() -> Result<Vec<u8>> {
        Ok(Assets::load(PAGE_FILE)?.into_owned())
    }

    /// Writes the page into an export directory, replacing any older copy.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn install(dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dest = dir.as_ref().join(PAGE_FILE);
        let contents = Assets::load(PAGE_FILE)?;
        std::fs::write(&dest, &contents).or_raise(|| ErrorKind::Install(dest.clone()))?;
        tracing::debug!(page = %dest.display(), bytes = contents.len(), "Installed viewer page");
        Ok(dest)
    }

    /// The installed page inside `dir`, if there is one.
    pub fn locate(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let path = dir.as_ref().join(PAGE_FILE);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_then_locate() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Page::locate(dir.path()), None);
        let installed = Page::install(dir.path()).unwrap();
        assert_eq!(installed, dir.path().join(PAGE_FILE));
        assert_eq!(Page::locate(dir.path()), Some(installed.clone()));
        assert_eq!(std::fs::read(installed).unwrap(), Page::contents().unwrap());
    }

    #[test]
    fn install_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PAGE_FILE), b"old").unwrap();
        Page::install(dir.path()).unwrap();
        assert_ne!(std::fs::read(dir.path().join(PAGE_FILE)).unwrap(), b"old");
    }

    #[test]
    fn install_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Page::install(&missing).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Install(p) if p == &missing.join(PAGE_FILE)));
    }
}
