use crate::error::Result;
use crate::models::{Marker, ReportLine};
use crate::record::read_manifest;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

const SECS_PER_DAY: u64 = 86_400;

/// Aggregate the manifests of every commit modified within the last `days` days.
pub fn since(days: u64, meta_dir: &Path, now: SystemTime) -> Result<Vec<ReportLine>> {
    let cutoff = now
        .checked_sub(Duration::from_secs(days.saturating_mul(SECS_PER_DAY)))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut seen: BTreeMap<String, BTreeSet<Marker>> = BTreeMap::new();
    for entry in fs::read_dir(meta_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if modified <= cutoff {
            continue;
        }

        debug!("Reading commit {}", entry.path().display());
        for item in read_manifest(&entry.path())? {
            seen.entry(item.path).or_default().insert(item.marker);
        }
    }

    Ok(seen
        .into_iter()
        .map(|(path, markers)| ReportLine { path, markers })
        .collect())
}
