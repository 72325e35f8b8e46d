//! Configuration loading.
//!
//! The config is a JSON document, by default at `~/.config/sds/sds.json`.
//! Every `~` in the raw text is replaced by the home directory before parsing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SDS_CONFIG";
const HOME_TOKEN: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory receiving `<name>.tar.gz` bundles
    pub bundles: PathBuf,

    /// Directory holding one subdirectory per dataset
    pub store: PathBuf,

    /// Scratch directory holding the working area
    pub cache: PathBuf,

    /// Retention window for `diff`, in days
    pub since: u64,
}

impl Config {
    /// Parse a config document, substituting `home` for every `~`.
    pub fn parse(raw: &str, home: &Path) -> Result<Self> {
        let expanded = raw.replace(HOME_TOKEN, &home.to_string_lossy());
        Ok(serde_json::from_str(&expanded)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
        let raw = fs::read_to_string(path)?;
        let config = Self::parse(&raw, &home)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Location used when neither `--config` nor `SDS_CONFIG` is given.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".config").join("sds").join("sds.json"))
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))
    }

    /// Check the configured directories before anything is mutated.
    ///
    /// `store` and `bundles` must already exist; `cache` is created.
    pub fn validate(&self) -> Result<()> {
        for dir in [&self.store, &self.bundles] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory(dir.clone()));
            }
        }
        if !self.cache.exists() {
            tracing::info!("Creating cache directory {}", self.cache.display());
            fs::create_dir_all(&self.cache)?;
        }
        Ok(())
    }
}
