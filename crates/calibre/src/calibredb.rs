use crate::Library;
use crate::error::{ErrorKind, Result};
use crate::record::{DEFAULT_FIELDS, Record};
use exn::ResultExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// Where the macOS app bundle keeps the command-line tools.
const BUNDLED_EXECUTABLES: &[&str] = &[
    "/Applications/calibre.app/Contents/MacOS/calibredb",
    "/Applications/calibre.app/Contents/ebook-viewer.app/Contents/MacOS/calibredb",
];

/// Reads a Calibre library by running Calibre's own `calibredb` tool.
///
/// # Example
///
/// ```no_run
/// use shelf_calibre::{Calibredb, Library};
/// # use shelf_calibre::error::Result;
///
/// # fn list() -> Result<()> {
/// let calibredb = Calibredb::new(Calibredb::discover(None)?)
///     .with_library(Some("/home/me/Calibre Library".into()))?
///     .with_extra_fields(["*genre"]);
/// for record in calibredb.records()? {
///     println!("{}: {}", record.id, record.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Calibredb {
    executable: PathBuf,
    library: Option<PathBuf>,
    extra_fields: Vec<String>,
}
impl Calibredb {
    /// Finds the calibredb executable.
    ///
    /// An explicitly configured path wins if it exists. Otherwise the app
    /// bundle locations are checked, then `PATH`.
    pub fn discover(configured: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = configured {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            tracing::warn!(path = %path.display(), "Configured calibredb does not exist; searching elsewhere");
        }
        for candidate in BUNDLED_EXECUTABLES.iter().map(Path::new) {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
        }
        if let Ok(path) = which::which("calibredb") {
            return Ok(path);
        }
        tracing::info!(tried = ?BUNDLED_EXECUTABLES, "calibredb not found in PATH or app bundles");
        exn::bail!(ErrorKind::CalibredbNotFound);
    }

    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into(), library: None, extra_fields: vec![] }
    }

    /// Sets the library to read. `None` lets calibredb use whichever library
    /// Calibre itself considers current.
    ///
    /// Returns [`ErrorKind::NotALibrary`] if the directory does not contain a
    /// `metadata.db`.
    pub fn with_library(mut self, library: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = &library
            && !crate::library::is_library(path)
        {
            exn::bail!(ErrorKind::NotALibrary(path.clone()));
        }
        self.library = library;
        Ok(self)
    }

    /// Requests additional fields (e.g. custom columns such as `*genre`) on
    /// top of [`DEFAULT_FIELDS`]. Their values end up in
    /// [`Record::extra`] unchanged.
    pub fn with_extra_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn library(&self) -> Option<&Path> {
        self.library.as_deref()
    }

    /// The comma-separated `--fields` argument.
    pub(crate) fn fields(&self) -> String {
        let mut fields: Vec<&str> = DEFAULT_FIELDS.to_vec();
        for extra in &self.extra_fields {
            let extra = extra.trim();
            if !extra.is_empty() && !fields.contains(&extra) {
                fields.push(extra);
            }
        }
        fields.join(",")
    }

    /// Runs calibredb with the given arguments and returns its stdout.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let mut command = Command::new(&self.executable);
        command.args(args);
        if let Some(library) = &self.library {
            command.arg("--library-path").arg(library);
        }
        tracing::debug!(command = ?command, "Running calibredb");
        let output = command.output().or_raise(|| ErrorKind::NotExecutable(self.executable.clone()))?;
        if !output.status.success() {
            exn::bail!(ErrorKind::CalibredbFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl Library for Calibredb {
    #[instrument(skip_all, fields(library = ?self.library))]
    fn records(&self) -> Result<Vec<Record>> {
        let fields = self.fields();
        let stdout = self.run(&["list", "--for-machine", "--fields", &fields])?;
        parse_list_output(&stdout)
    }
}

/// Parses `calibredb list --for-machine`: a JSON array of objects. Entries that
/// are not objects, or that have no usable ID, are skipped.
pub(crate) fn parse_list_output(stdout: &[u8]) -> Result<Vec<Record>> {
    let entries: Vec<Value> = serde_json::from_slice(stdout).or_raise(|| ErrorKind::InvalidOutput)?;
    let total = entries.len();
    let records: Vec<Record> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(raw) => Record::from_raw(raw),
            other => {
                tracing::warn!(entry = ?other, "Skipping non-object entry in calibredb output");
                None
            },
        })
        .collect();
    tracing::info!(found = total, usable = records.len(), "Read book records from calibredb");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fields_include_extras_once() {
        let calibredb = Calibredb::new("calibredb").with_extra_fields(["*genre", "title", " ", "*genre"]);
        let fields = calibredb.fields();
        assert!(fields.starts_with("id,title,authors,"));
        assert!(fields.ends_with(",identifiers,*genre"));
        assert_eq!(fields.matches("title").count(), 1);
    }

    #[test]
    fn test_discover_prefers_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("calibredb");
        std::fs::write(&exe, b"").unwrap();
        assert_eq!(Calibredb::discover(Some(&exe)).unwrap(), exe);
    }

    #[test]
    fn test_with_library_rejects_non_library() {
        let dir = tempfile::tempdir().unwrap();
        let err = Calibredb::new("calibredb").with_library(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotALibrary(p) if p == dir.path()));
    }

    #[test]
    fn test_with_library_accepts_library() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.db"), b"").unwrap();
        let calibredb = Calibredb::new("calibredb").with_library(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(calibredb.library(), Some(dir.path()));
    }

    #[test]
    fn test_parse_list_output() {
        let stdout = br#"[
            {"id": 2, "title": "Second", "authors": "B"},
            "garbage",
            {"title": "No id"},
            {"id": 1, "title": "First", "authors": ["A"]}
        ]"#;
        let records = parse_list_output(stdout).unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"Another calibre program is running".as_slice())]
    #[case(br#"{"id": 1}"#.as_slice())]
    fn test_parse_list_output_invalid(#[case] stdout: &[u8]) {
        let err = parse_list_output(stdout).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidOutput));
    }

    #[test]
    fn test_missing_executable() {
        let calibredb = Calibredb::new("/definitely/not/here/calibredb");
        let err = calibredb.records().unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotExecutable(_)));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("calibredb");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_records_from_process() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), r#"echo '[{"id": 1, "title": "Dune", "authors": "Frank Herbert"}]'"#);
            let records = Calibredb::new(exe).records().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].title, "Dune");
        }

        #[test]
        fn test_failure_reports_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'library is locked' >&2\nexit 3");
            let err = Calibredb::new(exe).records().unwrap_err();
            match &*err {
                ErrorKind::CalibredbFailed { code, stderr } => {
                    assert_eq!(*code, Some(3));
                    assert_eq!(stderr, "library is locked");
                },
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
