use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{checkout, commit, diff, exec, init, ls, status};

#[derive(Parser)]
#[command(name = "sds")]
#[command(version, about = "Snapshot datasets with commit history and bundles", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/sds/sds.json)
    #[arg(short, long, global = true, env = "SDS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List datasets in the store
    Ls,

    /// Create the metadata and data directories in the current directory
    Init,

    /// Show files added or removed within the retention window
    Diff {
        /// Dataset name
        name: String,

        /// Override the configured retention window, in days
        #[arg(short, long)]
        days: Option<u64>,
    },

    /// Commit the working directory back to a dataset
    Commit {
        /// Dataset name
        name: String,
    },

    /// Check out a dataset into the working directory
    Checkout {
        /// Dataset name
        name: String,
    },

    /// Run a script inside the working directory
    Exec {
        /// Script to run
        script: PathBuf,
    },

    /// Show which dataset is checked out
    Status,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config;
    match cli.command {
        Commands::Ls => {
            ls::run(config)?;
        }
        Commands::Init => {
            init::run()?;
        }
        Commands::Diff { name, days } => {
            diff::run(name, days, config)?;
        }
        Commands::Commit { name } => {
            commit::run(name, config)?;
        }
        Commands::Checkout { name } => {
            checkout::run(name, config)?;
        }
        Commands::Exec { script } => {
            exec::run(script, config)?;
        }
        Commands::Status => {
            status::run(config)?;
        }
    }

    Ok(())
}
