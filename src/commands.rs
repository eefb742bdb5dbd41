//! Subcommand implementations. Each writes its user-facing output to `out`;
//! logs go through `tracing`.

use crate::cli::{ExportArgs, ListArgs, OpenArgs};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shelf_calibre::{Calibredb, find_default_library};
use shelf_catalog::view::{Catalog, Direction, Sort, ViewState, render};
use shelf_config::Config;
use shelf_export::Exporter;
use shelf_viewer::{Opener, Shown};
use std::io::Write;
use tracing::instrument;

#[instrument(skip_all)]
pub(crate) fn export(args: ExportArgs, config: Config, out: &mut impl Write) -> Result<()> {
    let config = args.apply(config);
    let executable = Calibredb::discover(config.calibredb.as_deref()).or_raise(|| ErrorKind::Calibre)?;
    let library = config.library.or_else(|| {
        let found = find_default_library();
        match &found {
            Some(path) => tracing::info!(library = %path.display(), "Found Calibre library"),
            None => tracing::warn!("No Calibre library found in the usual places; using calibredb's default"),
        }
        found
    });
    let calibredb = Calibredb::new(executable)
        .with_library(library)
        .or_raise(|| ErrorKind::Calibre)?
        .with_extra_fields(config.extra_fields);
    tracing::info!(calibredb = %calibredb.executable().display(), library = ?calibredb.library(), "Using calibredb");
    let summary = Exporter::new(&calibredb, config.output)
        .with_covers(config.covers)
        .with_limit(config.limit)
        .run()
        .or_raise(|| ErrorKind::Export)?;
    writeln!(out, "{summary}").or_raise(|| ErrorKind::Output)
}

pub(crate) fn list(args: ListArgs, config: Config, out: &mut impl Write) -> Result<()> {
    let dir = args.dir.unwrap_or(config.output);
    let catalog = Catalog::open(&dir);
    let direction = if args.desc { Direction::Descending } else { Direction::Ascending };
    let state = ViewState::default()
        .with_query(args.search)
        .with_sort(args.sort.map(|field| Sort::new(field, direction)))
        .with_columns(args.columns.unwrap_or_default());
    let without_extended = catalog.snapshot().is_some_and(|s| !s.books.is_empty() && s.metadata.is_empty());
    if without_extended && state.columns.iter().any(|c| c.is_extended()) {
        tracing::warn!("No extended metadata in this export; publisher, language and rating columns will be blank");
    }
    write!(out, "{}", render(&catalog, &state)).or_raise(|| ErrorKind::Output)
}

pub(crate) fn open(args: OpenArgs, config: Config, out: &mut impl Write) -> Result<()> {
    let dir = args.dir.unwrap_or(config.output);
    let written = match shelf_viewer::show(&dir, args.with.map(Opener::new)).or_raise(|| ErrorKind::Viewer)? {
        Shown::Opened(page) => writeln!(out, "Opened {}", page.display()),
        Shown::NotFound(message) => writeln!(out, "{message}"),
    };
    written.or_raise(|| ErrorKind::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::Path;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args.iter().copied()).unwrap().command
    }

    fn config(output: &Path) -> Config {
        Config { output: output.to_path_buf(), ..Config::default() }
    }

    #[test]
    fn test_export_rejects_non_library() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("calibredb");
        let Command::Export(args) = parse(&[
            "shelf",
            "export",
            "--calibredb",
            missing.to_str().unwrap(),
            "-l",
            dir.path().to_str().unwrap(),
        ]) else {
            panic!("not an export")
        };
        let output = dir.path().join("site");
        let mut out = Vec::new();
        let err = export(args, config(&output), &mut out).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Calibre));
        assert!(out.is_empty());
        assert!(!output.exists());
    }

    #[test]
    fn test_open_without_page_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let Command::Open(args) = parse(&["shelf", "open", dir.path().to_str().unwrap()]) else {
            panic!("not an open")
        };
        let mut out = Vec::new();
        open(args, Config::default(), &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Error: books.html not found"));
    }

    #[test]
    fn test_list_without_snapshot_prints_notice() {
        let dir = tempfile::tempdir().unwrap();
        let Command::List(args) = parse(&["shelf", "list"]) else { panic!("not a list") };
        let mut out = Vec::new();
        list(args, config(dir.path()), &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Unable to load library"));
    }

    #[cfg(unix)]
    #[test]
    fn test_export_succeeds_with_missing_cover() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let library = dir.path().join("library");
        std::fs::create_dir_all(&library).unwrap();
        std::fs::write(library.join("metadata.db"), b"").unwrap();
        let calibredb = dir.path().join("calibredb");
        let records = r#"[{"id": 1, "title": "Mort", "cover": "/definitely/not/here/cover.jpg"}]"#;
        std::fs::write(&calibredb, format!("#!/bin/sh\necho '{records}'\n")).unwrap();
        std::fs::set_permissions(&calibredb, std::fs::Permissions::from_mode(0o755)).unwrap();

        let output = dir.path().join("site");
        let Command::Export(args) = parse(&[
            "shelf",
            "export",
            "--calibredb",
            calibredb.to_str().unwrap(),
            "-l",
            library.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]) else {
            panic!("not an export")
        };
        let mut out = Vec::new();
        export(args, Config::default(), &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Exported 1 books"));
        assert!(printed.contains("0 copied, 1 missing"));
        assert!(output.join(shelf_catalog::BOOKS_FILE).is_file());
    }
}
