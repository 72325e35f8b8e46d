use crate::error::Result;
use crate::tools::Archiver;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BUNDLE_EXT: &str = "tar.gz";
const TMP_EXT: &str = "tmp";

pub fn bundle_path(bundles_dir: &Path, name: &str) -> PathBuf {
    bundles_dir.join(format!("{}.{}", name, BUNDLE_EXT))
}

fn tmp_path(bundle: &Path) -> PathBuf {
    let mut tmp = OsString::from(bundle.as_os_str());
    tmp.push(".");
    tmp.push(TMP_EXT);
    PathBuf::from(tmp)
}

/// Archive `data_dir` into `bundle`.
///
/// The archive is built at `<bundle>.tmp` and only moved over `bundle` once the
/// archiver succeeds; on failure the temp file is removed and any existing
/// bundle is left as it was.
pub fn rebuild(archiver: &dyn Archiver, data_dir: &Path, bundle: &Path) -> Result<()> {
    let tmp = tmp_path(bundle);
    info!("Bundling {} into {}", data_dir.display(), bundle.display());

    if let Err(e) = archiver.archive(data_dir, &tmp) {
        if tmp.exists() {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
        }
        return Err(e);
    }

    if bundle.exists() {
        fs::remove_file(bundle)?;
    }
    fs::rename(&tmp, bundle)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{write_tree, CrashingArchiver, ListingArchiver};
    use tempfile::TempDir;

    #[test]
    fn test_bundle_path() {
        assert_eq!(
            bundle_path(Path::new("/bundles"), "photos"),
            PathBuf::from("/bundles/photos.tar.gz")
        );
        assert_eq!(
            tmp_path(Path::new("/bundles/photos.tar.gz")),
            PathBuf::from("/bundles/photos.tar.gz.tmp")
        );
    }

    #[test]
    fn test_rebuild_creates_bundle() {
        let dir = TempDir::new().unwrap();
        let data = write_tree(&dir.path().join("data"), &[("a.txt", "1")]);
        let bundle = bundle_path(dir.path(), "ds");

        rebuild(&ListingArchiver, &data, &bundle).unwrap();

        assert_eq!(fs::read_to_string(&bundle).unwrap(), "a.txt");
        assert!(!tmp_path(&bundle).exists());
    }

    #[test]
    fn test_rebuild_replaces_existing_bundle() {
        let dir = TempDir::new().unwrap();
        let data = write_tree(&dir.path().join("data"), &[("b.txt", "2")]);
        let bundle = bundle_path(dir.path(), "ds");
        fs::write(&bundle, "old").unwrap();

        rebuild(&ListingArchiver, &data, &bundle).unwrap();

        assert_eq!(fs::read_to_string(&bundle).unwrap(), "b.txt");
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_bundle() {
        let dir = TempDir::new().unwrap();
        let data = write_tree(&dir.path().join("data"), &[("a.txt", "1")]);
        let bundle = bundle_path(dir.path(), "ds");
        fs::write(&bundle, "previous").unwrap();

        assert!(rebuild(&CrashingArchiver, &data, &bundle).is_err());

        assert_eq!(fs::read_to_string(&bundle).unwrap(), "previous");
        assert!(!tmp_path(&bundle).exists());
    }

    #[test]
    fn test_failed_first_rebuild_leaves_no_bundle() {
        let dir = TempDir::new().unwrap();
        let data = write_tree(&dir.path().join("data"), &[("a.txt", "1")]);
        let bundle = bundle_path(dir.path(), "ds");

        assert!(rebuild(&CrashingArchiver, &data, &bundle).is_err());

        assert!(!bundle.exists());
        assert!(!tmp_path(&bundle).exists());
    }
}
