//! Names for commit directories and the diff artifacts inside them.

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone};
use sha2::{Digest, Sha256};
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const TIME_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";
const MAX_INDEX: u8 = 9;
const MAX_STEM: usize = 50;
const HASH_LEN: usize = 7;

/// Create a fresh `yyyy.MM.dd.HH.mm.ss.N` directory under `meta_dir`.
///
/// Same-second collisions bump `N`; once all ten slots are taken the call fails
/// without touching anything.
pub fn create_commit_dir<Tz>(meta_dir: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = now.format(TIME_FORMAT).to_string();

    for idx in 0..=MAX_INDEX {
        let dest = meta_dir.join(format!("{}.{}", stamp, idx));
        match fs::create_dir(&dest) {
            Ok(()) => return Ok(dest),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(Error::CommitSlotsExhausted(stamp))
}

/// Artifact file name for a relative path: a sanitized stem plus a short hash
/// of the raw path bytes, so truncated or lossy stems stay distinct.
pub fn artifact_name<P: AsRef<Path>>(rel_path: P) -> String {
    let rel_path = rel_path.as_ref();
    let lowered = rel_path.to_string_lossy().replace(['/', ' '], "-").to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| *c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    let trimmed = cleaned.strip_prefix('-').unwrap_or(&cleaned);
    let stem: String = trimmed.chars().take(MAX_STEM).collect();

    format!("{}.{}", stem, short_hash(rel_path.as_os_str().as_encoded_bytes()))
}

fn short_hash(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(HASH_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_commit_dir_format() {
        let dir = TempDir::new().unwrap();
        let commit = create_commit_dir(dir.path(), &fixed_time()).unwrap();

        assert_eq!(commit.file_name().unwrap(), "2024.03.09.14.05.07.0");
        assert!(commit.is_dir());
    }

    #[test]
    fn test_commit_dir_slots_exhausted() {
        let dir = TempDir::new().unwrap();
        let now = fixed_time();

        for idx in 0..10 {
            let commit = create_commit_dir(dir.path(), &now).unwrap();
            assert_eq!(
                commit.file_name().unwrap().to_string_lossy(),
                format!("2024.03.09.14.05.07.{}", idx)
            );
        }

        let err = create_commit_dir(dir.path(), &now).unwrap_err();
        assert!(matches!(err, Error::CommitSlotsExhausted(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 10);
    }

    #[test]
    fn test_commit_dir_names_sort_by_time() {
        let dir = TempDir::new().unwrap();
        let early = create_commit_dir(dir.path(), &fixed_time()).unwrap();
        let late = create_commit_dir(
            dir.path(),
            &Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();

        assert!(early.file_name() < late.file_name());
    }

    #[test]
    fn test_artifact_name_sanitizes() {
        let name = artifact_name("/Docs/My File_v2.TXT");
        let (stem, hash) = name.rsplit_once('.').unwrap();

        assert_eq!(stem, "docs-my-filev2txt");
        assert_eq!(hash.len(), 7);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_artifact_name_truncates_and_stays_distinct() {
        let prefix = "a".repeat(80);
        let one = artifact_name(&format!("{}/one.txt", prefix));
        let two = artifact_name(&format!("{}/two.txt", prefix));

        assert_eq!(one.split('.').next().unwrap().len(), 50);
        assert_ne!(one, two);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_artifact_name_non_utf8_paths_differ() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let one = artifact_name(OsStr::from_bytes(b"caf\xe9.txt"));
        let two = artifact_name(OsStr::from_bytes(b"caf\xe8.txt"));
        assert_ne!(one, two);
        assert!(one.starts_with("caftxt."));
    }

    #[test]
    fn test_artifact_name_is_deterministic() {
        assert_eq!(artifact_name("b.txt"), artifact_name("b.txt"));
        assert!(artifact_name("b.txt").starts_with("btxt."));
    }
}
