use crate::error::{Error, Result};
use crate::models::CheckoutState;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const WORK_DIR: &str = "build";
const STATE_FILE: &str = "checkout.json";

/// The single shared working tree under the cache directory, plus a record of
/// which dataset it currently holds.
///
/// Not safe for concurrent use: two processes checking out or committing at
/// the same time will corrupt each other's view.
#[derive(Debug, Clone)]
pub struct WorkingArea {
    root: PathBuf,
    state_file: PathBuf,
}

impl WorkingArea {
    pub fn new<P: AsRef<Path>>(cache: P) -> Self {
        let cache = cache.as_ref();
        Self {
            root: cache.join(WORK_DIR),
            state_file: cache.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn active(&self) -> Result<Option<CheckoutState>> {
        if !self.state_file.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.state_file)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Wipe and recreate an empty tree, forgetting the previous checkout.
    pub fn reset(&self) -> Result<()> {
        match self.active() {
            Ok(Some(previous)) => warn!(
                "Discarding working directory of {} (checked out {})",
                previous.dataset,
                previous.checked_out.to_rfc3339()
            ),
            Ok(None) => {}
            Err(e) => warn!(
                "Ignoring unreadable checkout state {}: {}",
                self.state_file.display(),
                e
            ),
        }
        if self.state_file.exists() {
            fs::remove_file(&self.state_file)?;
        }
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Record `dataset` as checked out. The state file is written beside its
    /// final name and renamed into place, so readers never see a partial file.
    pub fn mark_checked_out(&self, dataset: &str) -> Result<CheckoutState> {
        let state = CheckoutState::new(dataset);
        let tmp = self.tmp_state_file();
        fs::write(&tmp, serde_json::to_string_pretty(&state)?)?;
        if let Err(e) = fs::rename(&tmp, &self.state_file) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(state)
    }

    fn tmp_state_file(&self) -> PathBuf {
        let mut name = self.state_file.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Ensure the tree exists and holds `dataset`.
    pub fn require(&self, dataset: &str) -> Result<CheckoutState> {
        if !self.exists() {
            return Err(Error::NothingToCommit);
        }
        let state = self.active()?.ok_or(Error::NoActiveCheckout)?;
        if state.dataset != dataset {
            return Err(Error::CheckoutMismatch {
                active: state.dataset,
                requested: dataset.to_string(),
            });
        }
        Ok(state)
    }
}
