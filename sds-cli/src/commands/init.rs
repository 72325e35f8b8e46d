use anyhow::{Context, Result};
use colored::Colorize;
use sds_core::Store;

pub fn run() -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let created = Store::init(&cwd)?;

    if created.is_empty() {
        println!("{}", "Already initialized".yellow());
        return Ok(());
    }

    for dir in created {
        println!("  {} {}", "created".green(), dir.display());
    }

    Ok(())
}
