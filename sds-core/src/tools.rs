//! External collaborators: tree mirroring, unified diffs and archiving.
//!
//! Each capability is a trait so the orchestration in [`crate::store`] does not
//! care whether the work happens in a subprocess or in-process.

use crate::error::{Error, Result};
use similar::TextDiff;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, MAIN_SEPARATOR_STR};
use std::process::{Command, Stdio};
use tracing::debug;

pub const RSYNC_ENV: &str = "SDS_RSYNC";
pub const TAR_ENV: &str = "SDS_TAR";

const RSYNC_DEFAULTS: &[&str] = &["-ac", "--delete-after"];
const TAR_DEFAULTS: &[&str] = &["czf"];

/// One-way replication of a directory, removing stale entries at the destination.
pub trait TreeMirror {
    fn mirror(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Line diff between two files. `None` means the contents are identical.
pub trait UnifiedDiffer {
    fn diff(&self, old: &Path, new: &Path) -> Result<Option<Vec<u8>>>;
}

/// Writes a compressed archive of `source` to `dest`.
pub trait Archiver {
    fn archive(&self, source: &Path, dest: &Path) -> Result<()>;
}

/// The set of collaborators a [`crate::Store`] drives.
pub struct Toolchain {
    pub mirror: Box<dyn TreeMirror>,
    pub differ: Box<dyn UnifiedDiffer>,
    pub archiver: Box<dyn Archiver>,
}

impl Toolchain {
    /// rsync, diff and tar, with flag overrides read from the environment.
    pub fn system() -> Self {
        Self {
            mirror: Box::new(Rsync::from_env()),
            differ: Box::new(DiffTool),
            archiver: Box::new(Tar::from_env()),
        }
    }
}

/// Flags from `key` if set and non-blank, otherwise `defaults`.
pub fn flags_from_env(key: &str, defaults: &[&str]) -> Vec<String> {
    parse_flags(env::var(key).ok().as_deref(), defaults)
}

fn parse_flags(value: Option<&str>, defaults: &[&str]) -> Vec<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.split_whitespace().map(String::from).collect(),
        _ => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

fn run_inherited(tool: &str, cmd: &mut Command) -> Result<()> {
    debug!("Running {:?}", cmd);
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| Error::ToolSpawn {
            tool: tool.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Rsync {
    flags: Vec<String>,
}

impl Rsync {
    pub fn new(flags: Vec<String>) -> Self {
        Self { flags }
    }

    pub fn from_env() -> Self {
        Self::new(flags_from_env(RSYNC_ENV, RSYNC_DEFAULTS))
    }

    /// Flags, then `from` with a trailing separator so its contents are
    /// copied rather than the directory itself, then `to`.
    fn args(&self, from: &Path, to: &Path) -> Vec<OsString> {
        let mut source = from.as_os_str().to_owned();
        source.push(MAIN_SEPARATOR_STR);

        let mut args: Vec<OsString> = self.flags.iter().map(OsString::from).collect();
        args.push(source);
        args.push(to.as_os_str().to_owned());
        args
    }
}

impl TreeMirror for Rsync {
    fn mirror(&self, from: &Path, to: &Path) -> Result<()> {
        run_inherited("rsync", Command::new("rsync").args(self.args(from, to)))
    }
}

/// `diff --unified=0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffTool;

impl UnifiedDiffer for DiffTool {
    fn diff(&self, old: &Path, new: &Path) -> Result<Option<Vec<u8>>> {
        let output = Command::new("diff")
            .arg("--unified=0")
            .arg(old)
            .arg(new)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::ToolSpawn {
                tool: "diff".to_string(),
                source,
            })?;

        match output.status.code() {
            Some(0) => Ok(None),
            Some(1) => Ok(Some(output.stdout)),
            _ => Err(Error::ToolFailed {
                tool: "diff".to_string(),
                status: output.status.to_string(),
            }),
        }
    }
}

/// In-process differ producing zero-context unified hunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarDiffer;

impl UnifiedDiffer for SimilarDiffer {
    fn diff(&self, old: &Path, new: &Path) -> Result<Option<Vec<u8>>> {
        let old_bytes = fs::read(old)?;
        let new_bytes = fs::read(new)?;
        if old_bytes == new_bytes {
            return Ok(None);
        }

        let old_name = old.to_string_lossy();
        let new_name = new.to_string_lossy();
        let out = match (
            std::str::from_utf8(&old_bytes),
            std::str::from_utf8(&new_bytes),
        ) {
            (Ok(old_text), Ok(new_text)) => TextDiff::from_lines(old_text, new_text)
                .unified_diff()
                .context_radius(0)
                .header(&old_name, &new_name)
                .to_string(),
            _ => format!("Binary files {} and {} differ\n", old_name, new_name),
        };

        Ok(Some(out.into_bytes()))
    }
}

#[derive(Debug, Clone)]
pub struct Tar {
    flags: Vec<String>,
}

impl Tar {
    pub fn new(flags: Vec<String>) -> Self {
        Self { flags }
    }

    pub fn from_env() -> Self {
        Self::new(flags_from_env(TAR_ENV, TAR_DEFAULTS))
    }
}

impl Archiver for Tar {
    fn archive(&self, source: &Path, dest: &Path) -> Result<()> {
        run_inherited(
            "tar",
            Command::new("tar")
                .args(&self.flags)
                .arg(dest)
                .arg("-C")
                .arg(source)
                .arg("."),
        )
    }
}
