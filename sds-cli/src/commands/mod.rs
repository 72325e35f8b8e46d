pub mod checkout;
pub mod commit;
pub mod diff;
pub mod exec;
pub mod init;
pub mod ls;
pub mod status;

use anyhow::{Context, Result};
use sds_core::{Config, Store, WorkingArea};
use std::path::PathBuf;

pub struct Session {
    pub config: Config,
    pub store: Store,
    pub working: WorkingArea,
}

pub fn get_config_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path),
        None => Ok(Config::default_path()?),
    }
}

/// Load and validate the config, failing before anything is touched.
pub fn open(custom_path: Option<PathBuf>) -> Result<Session> {
    let config_path = get_config_path(custom_path)?;
    tracing::debug!("Using config {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let store = Store::from_config(&config).context("Invalid configuration")?;
    let working = WorkingArea::new(&config.cache);

    Ok(Session {
        config,
        store,
        working,
    })
}
