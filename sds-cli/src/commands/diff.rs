use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(name: String, days: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;
    let days = days.unwrap_or(session.config.since);

    let report = session.store.diff(&name, days)?;
    if report.is_empty() {
        println!(
            "{}",
            format!("No files added or removed in the last {} day(s)", days).dimmed()
        );
        return Ok(());
    }

    for line in report {
        let marker = match line.marker_str() {
            "+" => "+".green(),
            "-" => "-".red(),
            both => both.yellow(),
        };
        println!("{}  {}", marker, line.path);
    }

    Ok(())
}
