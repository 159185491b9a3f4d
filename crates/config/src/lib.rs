//! Layered configuration.
//!
//! Values are merged, last one wins, from:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. a configuration file: either the one passed explicitly, or the first of
//!    `config.toml`, `config.yaml`, `config.yml`, `config.json` found in the
//!    user's configuration directory (e.g. `~/.config/sidecar/` on Linux),
//! 3. environment variables prefixed with `SIDECAR_`, nested keys separated by
//!    a double underscore (`SIDECAR_ASSOCIATE__MARKER=.json`).
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [associate]
//! marker = ".metadata.csv"
//! rows = "keep-first"
//! pretty = false
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use sidecar_record::RowPolicy;
use std::path::{Path, PathBuf};

/// Suffix marking a file as a metadata sidecar, unless configured otherwise.
pub const DEFAULT_MARKER: &str = ".metadata.csv";
pub const ENV_PREFIX: &str = "SIDECAR_";
const APPLICATION: &str = "sidecar";
const FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub associate: AssociateConfig,
}

/// Settings for the metadata association engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociateConfig {
    /// Literal string whose presence in a file name marks it as a metadata
    /// sidecar. Must not be empty.
    pub marker: String,
    /// What multi-row metadata documents yield.
    pub rows: RowPolicy,
    /// Pretty-print the association document.
    pub pretty: bool,
}
impl Default for AssociateConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            rows: RowPolicy::default(),
            pretty: false,
        }
    }
}

impl Config {
    /// Loads configuration from all layers. `file` replaces the lookup in the
    /// user's configuration directory, and must exist.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::extract(&figment(file)?)
    }

    /// Extracts and validates a configuration from an already-built [`Figment`].
    pub fn extract(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|e| ErrorKind::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.associate.marker.is_empty() {
            exn::bail!(ErrorKind::InvalidValue { key: "associate.marker", reason: "must not be empty" });
        }
        Ok(())
    }
}

/// Builds the layered [`Figment`] without extracting it.
pub fn figment(file: Option<&Path>) -> Result<Figment> {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let figment = match file {
        Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Some(path) => merge_file(figment, path)?,
        None => match default_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Using configuration file from user directory");
                merge_file(figment, &path)?
            },
            None => figment,
        },
    };
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

/// First configuration file present in the user's configuration directory.
pub fn default_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", APPLICATION)?;
    FILE_NAMES.iter().map(|name| dirs.config_dir().join(name)).find(|path| path.is_file())
}
