//! Run configuration.
//!
//! Each setting comes from the command line if given, then from the
//! `[mbget]` table of the config file (`mbget.toml` by default), then from
//! the built-in default. The GitHub token is only taken from the command
//! line or the `MBGET_GH_TOKEN` environment variable.

use crate::cache::CACHE_FILE;
use crate::error::MbgetError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "mbget.toml";
pub const TOKEN_ENV: &str = "MBGET_GH_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub manifest: PathBuf,
    pub package: PathBuf,
    pub directory: PathBuf,
    pub jungle: PathBuf,
    pub token: Option<String>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub package: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub jungle: Option<PathBuf>,
    pub token: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct ConfigFile {
    #[serde(default)]
    mbget: FileSettings,
}

#[derive(Deserialize, Debug, Default)]
struct FileSettings {
    manifest: Option<PathBuf>,
    package: Option<PathBuf>,
    directory: Option<PathBuf>,
    jungle: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("manifest.xml"),
            package: PathBuf::from("packages.txt"),
            directory: PathBuf::from(".mbpkg"),
            jungle: PathBuf::from("barrels.jungle"),
            token: None,
        }
    }
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let path = overrides
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let settings = if path.exists() {
            debug!("Reading config file {}", path.display());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            parse_settings(&path, &content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            FileSettings::default()
        };

        Ok(Self::merge(settings, overrides))
    }

    /// Build a config from TOML text, as if it had been read from `path`.
    pub fn from_toml_str(path: &Path, content: &str, overrides: ConfigOverrides) -> Result<Self> {
        Ok(Self::merge(parse_settings(path, content)?, overrides))
    }

    fn merge(file: FileSettings, cli: ConfigOverrides) -> Self {
        let defaults = Self::default();
        Self {
            manifest: cli.manifest.or(file.manifest).unwrap_or(defaults.manifest),
            package: cli.package.or(file.package).unwrap_or(defaults.package),
            directory: cli.directory.or(file.directory).unwrap_or(defaults.directory),
            jungle: cli.jungle.or(file.jungle).unwrap_or(defaults.jungle),
            token: cli.token,
        }
    }

    pub fn cache_file(&self) -> PathBuf {
        self.directory.join(CACHE_FILE)
    }

    /// Create the barrel directory so every output location is writable.
    pub fn prepare_project_dir(&self) -> Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).with_context(|| {
                format!(
                    "Failed to create barrel directory {}",
                    self.directory.display()
                )
            })?;
        }
        Ok(())
    }
}

fn parse_settings(path: &Path, content: &str) -> Result<FileSettings> {
    let file: ConfigFile = toml::from_str(content).map_err(|e| MbgetError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(file.mbget)
}
