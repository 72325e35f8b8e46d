use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} is required but missing", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Invalid dataset name: {0:?}")]
    InvalidDatasetName(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("No working directory to commit, run checkout first")]
    NothingToCommit,

    #[error("No working directory, run checkout first")]
    NoWorkingDirectory,

    #[error("Working directory has no recorded checkout")]
    NoActiveCheckout,

    #[error("Working directory holds {active}, not {requested}")]
    CheckoutMismatch { active: String, requested: String },

    #[error("Maximum commit index reached for {0}")]
    CommitSlotsExhausted(String),

    #[error("Script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {status}")]
    ToolFailed { tool: String, status: String },
}
