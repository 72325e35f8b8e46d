//! Diff recording between canonical data and the working tree.

use crate::error::Result;
use crate::models::{CommitRecord, ManifestEntry, Marker};
use crate::naming::artifact_name;
use crate::paths::{difference, display_key, list_files, FileSet};
use crate::tools::UnifiedDiffer;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const MANIFEST_FILE: &str = "files";
const BOTH_HEADER: &str = "+/-\n===\n";

/// Compare `canonical` (pre-image) with `working` (post-image) and write the
/// manifest and per-file artifacts into `commit_dir`.
pub fn record(
    canonical: &Path,
    working: &Path,
    commit_dir: &Path,
    differ: &dyn UnifiedDiffer,
) -> Result<CommitRecord> {
    let canonical_files = list_files(canonical)?;
    let working_files = list_files(working)?;

    let mut record = CommitRecord::default();
    record.manifest.extend(
        difference(&canonical_files, &working_files)
            .map(|p| ManifestEntry::new(Marker::Removed, display_key(p))),
    );
    record.manifest.extend(
        difference(&working_files, &canonical_files)
            .map(|p| ManifestEntry::new(Marker::Added, display_key(p))),
    );
    if !record.manifest.is_empty() {
        write_manifest(commit_dir, &record.manifest)?;
    }

    let mut pass = Pass {
        commit_dir,
        differ,
        record: &mut record,
    };
    pass.run(Marker::Removed, canonical, working, &canonical_files, &working_files)?;
    pass.run(Marker::Added, working, canonical, &working_files, &canonical_files)?;

    Ok(record)
}

fn write_manifest(commit_dir: &Path, manifest: &[ManifestEntry]) -> Result<()> {
    let lines: Vec<String> = manifest.iter().map(ManifestEntry::to_string).collect();
    fs::write(commit_dir.join(MANIFEST_FILE), lines.join("\n"))?;
    Ok(())
}

/// Read back a commit's manifest. A missing file means no adds or removes.
pub fn read_manifest(commit_dir: &Path) -> Result<Vec<ManifestEntry>> {
    let path = commit_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for line in fs::read_to_string(&path)?.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match ManifestEntry::parse(line) {
            Some(entry) => entries.push(entry),
            None => debug!("Skipping manifest line {:?} in {}", line, path.display()),
        }
    }
    Ok(entries)
}

/// One direction of the per-file comparison. Only the `Removed` pass (canonical
/// as source) runs the differ; shared paths are skipped on the way back.
struct Pass<'a> {
    commit_dir: &'a Path,
    differ: &'a dyn UnifiedDiffer,
    record: &'a mut CommitRecord,
}

impl Pass<'_> {
    fn run(
        &mut self,
        side: Marker,
        source: &Path,
        other: &Path,
        source_files: &FileSet,
        other_files: &FileSet,
    ) -> Result<()> {
        for file in source_files {
            let artifact = self.commit_dir.join(artifact_name(file));
            let source_file = source.join(file);

            let body = if other_files.contains(file) {
                if side != Marker::Removed {
                    continue;
                }
                match self.differ.diff(&source_file, &other.join(file))? {
                    Some(diff) => {
                        debug!("Changed: {}", file.display());
                        [BOTH_HEADER.as_bytes(), &diff[..]].concat()
                    }
                    None => continue,
                }
            } else {
                debug!("{} only: {}", side.dump_header(), file.display());
                let mut body = format!("{}\n", side.dump_header()).into_bytes();
                body.extend(fs::read(&source_file)?);
                body
            };

            fs::File::create(&artifact)?.write_all(&body)?;
            self.record.artifacts.push(artifact);
        }
        Ok(())
    }
}
