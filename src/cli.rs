use clap::{Args, Parser, Subcommand};
use shelf_catalog::view::{Columns, SortField};
use shelf_config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version, about = "Export a Calibre library into a static, browsable catalog", long_about = None)]
#[command(after_help = "EXAMPLES:
    shelf export                         Export the default library to ./output
    shelf export -l ~/Books -o site      Export a specific library
    shelf list -s pratchett --sort date  Search an export from the terminal
    shelf open site                      Open an export in the browser")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "SHELF_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}
impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> String {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        format!("shelf={level}")
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Export a Calibre library as a static catalog
    Export(ExportArgs),
    /// Print an exported catalog as a table
    List(ListArgs),
    /// Open an exported catalog in the browser
    Open(OpenArgs),
}

#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Path to the calibredb executable
    #[arg(long, value_name = "PATH")]
    pub calibredb: Option<PathBuf>,

    /// Calibre library directory (the one containing metadata.db)
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Do not export cover images
    #[arg(long)]
    pub no_covers: bool,

    /// Export at most this many books, lowest IDs first
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Extra calibredb field to include, such as a custom column (repeatable)
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,
}
impl ExportArgs {
    /// Flags take precedence over configuration.
    pub fn apply(self, mut config: Config) -> Config {
        if self.calibredb.is_some() {
            config.calibredb = self.calibredb;
        }
        if self.library.is_some() {
            config.library = self.library;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.no_covers {
            config.covers = false;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        config.extra_fields.extend(self.fields);
        config
    }
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Export directory (defaults to the configured output directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Only show books whose title, authors, series or tags contain this text
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub search: String,

    /// Sort by title, author, series or date
    #[arg(long, value_name = "FIELD", value_parser = parse_sort_field)]
    pub sort: Option<SortField>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Comma-separated columns to show, e.g. title,authors,rating (or "all")
    #[arg(long, value_name = "LIST", value_parser = parse_columns)]
    pub columns: Option<Columns>,
}

#[derive(Args)]
pub(crate) struct OpenArgs {
    /// Export directory (defaults to the configured output directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Program to open the page with instead of the system default
    #[arg(long, value_name = "PROGRAM")]
    pub with: Option<PathBuf>,
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|e: shelf_catalog::error::Error| (*e).to_string())
}

fn parse_columns(s: &str) -> Result<Columns, String> {
    s.parse().map_err(|e: shelf_catalog::error::Error| (*e).to_string())
}
