use anyhow::{Context, Result};
use sds_core::Store;
use std::path::PathBuf;

pub fn run(script: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;

    Store::exec(&session.working, &script)
        .with_context(|| format!("Failed to run {}", script.display()))?;

    Ok(())
}
