//! Backup models
//!
//! A backup is an immutable snapshot owned by the backup store: a
//! timestamp-derived identifier, the root it was taken from, and a manifest
//! mapping original paths to content-addressed blobs. Everything here
//! round-trips through JSON so backups survive process restarts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::artifact::ContentHash;

/// Manifest schema version for forward migration support
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Timestamp-derived backup identifier: `YYYYMMDD-HHMMSS-mmm`
///
/// Ids sort lexically in creation order, which is what makes the
/// directory-per-backup layout listable without opening manifests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupId(String);

impl BackupId {
    /// Derive an id from a wall-clock instant
    pub fn from_time(t: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{:03}",
            t.format("%Y%m%d-%H%M%S"),
            t.timestamp_subsec_millis()
        ))
    }

    /// Accept a string as an id if it parses as a backup timestamp
    pub fn parse(s: &str) -> Option<Self> {
        parse_backup_timestamp(s).map(|_| Self(s.to_string()))
    }

    /// The id as a directory name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant this id encodes
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_backup_timestamp(&self.0)
    }

    /// The id one millisecond later, for collision bumping
    pub fn succ(&self) -> Option<Self> {
        let t = self.timestamp()?;
        Some(Self::from_time(t + chrono::Duration::milliseconds(1)))
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a backup timestamp string
///
/// Expected format: YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm (with milliseconds)
pub fn parse_backup_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().ok()?
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 || millis > 999 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}

/// One path captured by a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Original path, relative to the backed-up root
    pub path: PathBuf,

    /// Blob holding the content; None means the path did not exist at
    /// snapshot time, so restoring removes it
    #[serde(default)]
    pub blob: Option<ContentHash>,

    /// Content size at snapshot time (0 when absent)
    #[serde(default)]
    pub size_bytes: u64,
}

impl ManifestEntry {
    /// Entry for a path that existed
    pub fn present(path: impl Into<PathBuf>, blob: ContentHash, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            blob: Some(blob),
            size_bytes,
        }
    }

    /// Entry for a path that was absent at snapshot time
    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            blob: None,
            size_bytes: 0,
        }
    }
}

/// The durable record of one backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Schema version for migration support
    pub schema_version: u32,

    /// The backup's identifier
    pub id: BackupId,

    /// When the backup was created
    pub created_at: DateTime<Utc>,

    /// Root the snapshot was taken from
    pub root_path: PathBuf,

    /// Captured paths, sorted
    pub entries: Vec<ManifestEntry>,
}

impl BackupManifest {
    /// Assemble a manifest, sorting entries by path
    pub fn new(
        id: BackupId,
        created_at: DateTime<Utc>,
        root_path: impl Into<PathBuf>,
        mut entries: Vec<ManifestEntry>,
    ) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            id,
            created_at,
            root_path: root_path.into(),
            entries,
        }
    }

    /// Total bytes captured
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }

    /// Blobs this manifest references
    pub fn blob_refs(&self) -> impl Iterator<Item = &ContentHash> {
        self.entries.iter().filter_map(|e| e.blob.as_ref())
    }
}

/// Listing-level metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    /// Identifier (also the directory name)
    pub id: BackupId,

    /// Directory holding this backup's manifest
    pub path: PathBuf,

    /// When the backup was created
    pub created_at: DateTime<Utc>,

    /// Number of captured paths
    pub entry_count: usize,

    /// Total bytes captured
    pub total_bytes: u64,
}
