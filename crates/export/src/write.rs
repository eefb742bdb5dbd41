use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes `dir/name` atomically: the content goes to a temporary file in the
/// same directory, which then replaces the destination. Readers see either
/// the old file or the complete new one.
pub(crate) fn atomically<F>(dir: &Path, name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> std::io::Result<()>,
{
    let dest = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir).or_raise(|| ErrorKind::Write(dest.clone()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer).or_raise(|| ErrorKind::Write(dest.clone()))?;
        writer.flush().or_raise(|| ErrorKind::Write(dest.clone()))?;
    }
    tmp.as_file().sync_all().or_raise(|| ErrorKind::Write(dest.clone()))?;
    // Temporary files are private to the owner; data files are meant to be served.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .or_raise(|| ErrorKind::Write(dest.clone()))?;
    }
    tmp.persist(&dest).or_raise(|| ErrorKind::Write(dest.clone()))?;
    tracing::debug!(file = %dest.display(), "Wrote data file");
    Ok(dest)
}
