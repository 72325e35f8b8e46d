use crate::bundle::{bundle_path, rebuild};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CheckoutState, CommitOutcome, CommitRecord, ReportLine};
use crate::naming::create_commit_dir;
use crate::record::record;
use crate::report::since;
use crate::tools::Toolchain;
use crate::working::WorkingArea;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub const META_DIR: &str = ".sds";
pub const DATA_DIR: &str = "data";

/// Directories of one named dataset inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub root: PathBuf,
    pub meta_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Dataset {
    fn locate(store: &Path, name: &str) -> Result<Self> {
        validate_name(name)?;
        let root = store.join(name);
        Ok(Self {
            name: name.to_string(),
            meta_dir: root.join(META_DIR),
            data_dir: root.join(DATA_DIR),
            root,
        })
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(Error::DatasetNotFound(self.name.clone()));
        }
        for dir in [&self.meta_dir, &self.data_dir] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory(dir.clone()));
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(Error::InvalidDatasetName(name.to_string()));
    }
    Ok(())
}

/// Drives commits, checkouts and reports against the datasets of one store.
pub struct Store {
    root: PathBuf,
    bundles: PathBuf,
    tools: Toolchain,
}

impl Store {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(root: P, bundles: Q, tools: Toolchain) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            bundles: bundles.as_ref().to_path_buf(),
            tools,
        }
    }

    /// Validate `config` and build a store using the system tools.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.store, &config.bundles, Toolchain::system()))
    }

    /// Create the metadata and data directories of a new dataset under `dir`.
    pub fn init(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for name in [META_DIR, DATA_DIR] {
            let path = dir.join(name);
            if !path.exists() {
                fs::create_dir(&path)?;
                created.push(path);
            }
        }
        Ok(created)
    }

    pub fn dataset(&self, name: &str) -> Result<Dataset> {
        let dataset = Dataset::locate(&self.root, name)?;
        dataset.ensure_initialized()?;
        Ok(dataset)
    }

    pub fn bundle_for(&self, name: &str) -> PathBuf {
        bundle_path(&self.bundles, name)
    }

    pub fn ls(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            names.push(entry?.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }

    /// Replace the working area with the canonical data of `name`.
    ///
    /// The working tree is wiped before mirroring; if the mirror then fails the
    /// tree is left partial and no checkout is recorded.
    pub fn checkout(&self, name: &str, working: &WorkingArea) -> Result<CheckoutState> {
        let dataset = self.dataset(name)?;

        working.reset()?;
        info!("Checking out {} into {}", name, working.path().display());
        self.tools.mirror.mirror(&dataset.data_dir, working.path())?;

        working.mark_checked_out(name)
    }

    pub fn commit(&self, name: &str, working: &WorkingArea) -> Result<CommitOutcome> {
        self.commit_at(name, working, &Local::now())
    }

    /// Record the working tree against canonical data, mirror it back and
    /// rebuild the bundle when anything changed or no bundle exists yet.
    pub fn commit_at(
        &self,
        name: &str,
        working: &WorkingArea,
        now: &DateTime<Local>,
    ) -> Result<CommitOutcome> {
        let dataset = self.dataset(name)?;
        working.require(name)?;

        let commit_dir = create_commit_dir(&dataset.meta_dir, now)?;
        debug!("Recording into {}", commit_dir.display());
        let record = match self.record_and_apply(&dataset, working, &commit_dir) {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&commit_dir) {
                    warn!(
                        "Failed to remove incomplete commit {}: {}",
                        commit_dir.display(),
                        cleanup
                    );
                }
                return Err(e);
            }
        };

        let commit_dir = if fs::read_dir(&commit_dir)?.next().is_none() {
            fs::remove_dir(&commit_dir)?;
            None
        } else {
            Some(commit_dir)
        };

        let bundle = self.bundle_for(name);
        let bundled = record.changed() || !bundle.exists();
        if bundled {
            rebuild(self.tools.archiver.as_ref(), &dataset.data_dir, &bundle)?;
        }

        Ok(CommitOutcome {
            commit_dir,
            record,
            bundled,
        })
    }

    /// Write the commit record, then mirror the working tree over canonical data.
    /// On error the caller discards `commit_dir`.
    fn record_and_apply(
        &self,
        dataset: &Dataset,
        working: &WorkingArea,
        commit_dir: &Path,
    ) -> Result<CommitRecord> {
        let record = record(
            &dataset.data_dir,
            working.path(),
            commit_dir,
            self.tools.differ.as_ref(),
        )?;
        self.tools.mirror.mirror(working.path(), &dataset.data_dir)?;
        Ok(record)
    }

    pub fn diff(&self, name: &str, days: u64) -> Result<Vec<ReportLine>> {
        let dataset = self.dataset(name)?;
        since(days, &dataset.meta_dir, SystemTime::now())
    }

    /// Run `script` with the working area as its current directory.
    pub fn exec(working: &WorkingArea, script: &Path) -> Result<()> {
        if !working.exists() {
            return Err(Error::NoWorkingDirectory);
        }
        if !script.is_file() {
            return Err(Error::ScriptNotFound(script.to_path_buf()));
        }
        let script = fs::canonicalize(script)?;
        let tool = script.to_string_lossy().to_string();

        info!("Running {} in {}", tool, working.path().display());
        let status = Command::new(&script)
            .current_dir(working.path())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::ToolSpawn {
                tool: tool.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed {
                tool,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
