use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub fn run(name: String, config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;

    let state = session
        .store
        .checkout(&name, &session.working)
        .with_context(|| format!("Failed to check out {}", name))?;

    println!("{}", format!("✓ Checked out {}", state.dataset).green().bold());
    println!(
        "  {}: {}",
        "Working directory".bold(),
        session.working.path().display()
    );

    Ok(())
}
