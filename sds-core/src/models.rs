use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Marker {
    Added,
    Removed,
}

impl Marker {
    pub fn as_str(&self) -> &str {
        match self {
            Marker::Added => "+",
            Marker::Removed => "-",
        }
    }

    pub fn parse(c: char) -> Option<Self> {
        match c {
            '+' => Some(Marker::Added),
            '-' => Some(Marker::Removed),
            _ => None,
        }
    }

    /// Header line written in front of a one-sided content dump.
    pub fn dump_header(&self) -> &str {
        match self {
            Marker::Added => "+++",
            Marker::Removed => "---",
        }
    }
}

/// One line of a commit's `files` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub marker: Marker,
    pub path: String,
}

impl ManifestEntry {
    pub fn new(marker: Marker, path: impl Into<String>) -> Self {
        Self {
            marker,
            path: path.into(),
        }
    }

    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut chars = line.chars();
        let marker = Marker::parse(chars.next()?)?;
        let path = chars.as_str();
        if path.is_empty() {
            return None;
        }
        Some(Self::new(marker, path))
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker.as_str(), self.path)
    }
}

/// What the working area currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    pub dataset: String,
    pub checked_out: DateTime<Utc>,
}

impl CheckoutState {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            checked_out: Utc::now(),
        }
    }
}

/// Result of recording the differences between canonical data and the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRecord {
    pub manifest: Vec<ManifestEntry>,
    pub artifacts: Vec<PathBuf>,
}

impl CommitRecord {
    pub fn changed(&self) -> bool {
        !self.manifest.is_empty() || !self.artifacts.is_empty()
    }

    pub fn count(&self, marker: Marker) -> usize {
        self.manifest.iter().filter(|e| e.marker == marker).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Commit directory, `None` when nothing changed and the record was dropped.
    pub commit_dir: Option<PathBuf>,
    pub record: CommitRecord,
    pub bundled: bool,
}

/// A single line of the retention report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub path: String,
    pub markers: BTreeSet<Marker>,
}

impl ReportLine {
    pub fn marker_str(&self) -> &str {
        let mut iter = self.markers.iter();
        match (iter.next(), iter.next()) {
            (Some(only), None) => only.as_str(),
            _ => "+/-",
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.marker_str(), self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_entry_parse() {
        let entry = ManifestEntry::parse("-a.txt").unwrap();
        assert_eq!(entry.marker, Marker::Removed);
        assert_eq!(entry.path, "a.txt");

        let entry = ManifestEntry::parse("  +dir/b c.txt \n").unwrap();
        assert_eq!(entry.marker, Marker::Added);
        assert_eq!(entry.path, "dir/b c.txt");

        assert!(ManifestEntry::parse("").is_none());
        assert!(ManifestEntry::parse("+").is_none());
        assert!(ManifestEntry::parse("*x.txt").is_none());
    }

    #[test]
    fn test_manifest_entry_display() {
        let entry = ManifestEntry::new(Marker::Added, "c.txt");
        assert_eq!(entry.to_string(), "+c.txt");
    }

    #[test]
    fn test_commit_record_changed() {
        let mut record = CommitRecord::default();
        assert!(!record.changed());

        record.artifacts.push(PathBuf::from("b-txt.1234567"));
        assert!(record.changed());
    }

    #[test]
    fn test_report_line_display() {
        let both = ReportLine {
            path: "x.txt".to_string(),
            markers: [Marker::Added, Marker::Removed].into_iter().collect(),
        };
        assert_eq!(both.to_string(), "+/-  x.txt");

        let removed = ReportLine {
            path: "y.txt".to_string(),
            markers: [Marker::Removed].into_iter().collect(),
        };
        assert_eq!(removed.to_string(), "-  y.txt");
    }

    #[test]
    fn test_checkout_state_roundtrip() {
        let state = CheckoutState::new("photos");
        let json = serde_json::to_string(&state).unwrap();
        let parsed: CheckoutState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, parsed);
    }
}
