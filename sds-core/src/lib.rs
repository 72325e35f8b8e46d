//! # sds-core
//!
//! Core library for sds - a snapshot-based synchronization engine for named
//! datasets.
//!
//! Each dataset in the store keeps its canonical data and a history of commit
//! records. Edits happen in a shared working area; committing records the
//! differences, mirrors the working tree back onto canonical data and rebuilds
//! a compressed bundle when anything changed.

pub mod bundle;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod paths;
pub mod record;
pub mod report;
pub mod store;
pub mod tools;
pub mod working;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{CheckoutState, CommitOutcome, CommitRecord, ManifestEntry, Marker, ReportLine};
pub use store::{Dataset, Store};
pub use tools::{Archiver, Toolchain, TreeMirror, UnifiedDiffer};
pub use working::WorkingArea;
