use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Relative file paths, kept as raw paths so non-UTF-8 names survive joins.
pub type FileSet = BTreeSet<PathBuf>;

/// Collect every regular file below `root` as a path relative to `root`.
pub fn list_files<P: AsRef<Path>>(root: P) -> Result<FileSet> {
    let root = root.as_ref();
    let mut files = FileSet::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.insert(rel.to_path_buf());
        }
    }

    Ok(files)
}

/// `/`-separated rendering of a relative path for manifests and reports.
pub fn display_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Entries of `left` that are not in `right`, in `left`'s order.
pub fn difference<'a>(left: &'a FileSet, right: &'a FileSet) -> impl Iterator<Item = &'a PathBuf> {
    left.iter().filter(move |p| !right.contains(*p))
}
