//! Configuration for shelf.
//!
//! Settings are layered with [`figment`], later sources overriding earlier
//! ones:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. `config.toml`, `config.yaml` and `config.json` in the platform config
//!    directory (e.g. `~/.config/shelf/` on Linux),
//! 3. an explicitly given configuration file,
//! 4. `SHELF_*` environment variables (e.g. `SHELF_OUTPUT=/srv/books`).
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const ENV_PREFIX: &str = "SHELF_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the calibredb executable; discovered automatically when unset.
    pub calibredb: Option<PathBuf>,
    /// Calibre library to export; auto-detected when unset.
    pub library: Option<PathBuf>,
    /// Directory the snapshot is written to.
    pub output: PathBuf,
    /// Whether cover images are exported.
    pub covers: bool,
    /// Export at most this many books (useful for trial runs).
    pub limit: Option<usize>,
    /// Additional calibredb fields to request, e.g. custom columns (`*genre`).
    pub extra_fields: Vec<String>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            calibredb: None,
            library: None,
            output: PathBuf::from("output"),
            covers: true,
            limit: None,
            extra_fields: vec![],
        }
    }
}
impl Config {
    /// Loads configuration from the platform config directory, an optional
    /// explicit file, and the environment.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let dir = Self::config_dir();
        tracing::debug!(config_dir = ?dir, "Loading configuration");
        Self::figment(dir.as_deref(), explicit)?.extract().or_raise(|| ErrorKind::Invalid)
    }

    /// The platform-specific configuration directory, if there is a home directory.
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn figment(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dir) = config_dir {
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Json::file(dir.join("config.json")));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }
}
