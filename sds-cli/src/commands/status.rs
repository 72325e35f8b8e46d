use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;

    match session.working.active()? {
        Some(state) => {
            println!("{}", "Working Directory".bold().cyan());
            println!("  {}: {}", "Dataset".bold(), state.dataset);
            println!(
                "  {}: {}",
                "Checked out".bold(),
                state.checked_out.format("%Y-%m-%d %H:%M:%S")
            );
            println!("  {}: {}", "Path".bold(), session.working.path().display());
        }
        None if session.working.exists() => {
            println!("{}", "Working directory has no recorded checkout".yellow());
            println!("Run {} to start over", "sds checkout <name>".cyan());
        }
        None => {
            println!("{}", "No active checkout".yellow());
        }
    }

    Ok(())
}
