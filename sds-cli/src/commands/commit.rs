use anyhow::{Context, Result};
use colored::Colorize;
use sds_core::Marker;
use std::path::PathBuf;

pub fn run(name: String, config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;

    let outcome = session
        .store
        .commit(&name, &session.working)
        .with_context(|| format!("Failed to commit {}", name))?;

    match &outcome.commit_dir {
        Some(dir) => {
            println!("{}", "✓ Commit recorded".green().bold());
            println!("  {}: {}", "Record".bold(), dir.display());
            println!(
                "  {}: {}",
                "Added".bold(),
                outcome.record.count(Marker::Added).to_string().green()
            );
            println!(
                "  {}: {}",
                "Removed".bold(),
                outcome.record.count(Marker::Removed).to_string().red()
            );
            println!(
                "  {}: {}",
                "Diffs".bold(),
                outcome.record.artifacts.len().to_string().cyan()
            );
        }
        None => println!("{}", "No changes to commit".yellow()),
    }

    if outcome.bundled {
        println!(
            "  {}: {}",
            "Bundle".bold(),
            session.store.bundle_for(&name).display()
        );
    }

    Ok(())
}
