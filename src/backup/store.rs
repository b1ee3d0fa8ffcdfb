//! Backup store
//!
//! One subdirectory per backup, named by its timestamp id, holding a
//! `manifest.json` that maps original paths to blobs in the shared object
//! pool. Backups are immutable once written and only ever removed by
//! explicit pruning.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, MigrateResult};
use crate::models::{Backup, BackupId, BackupManifest, ManifestEntry};
use crate::storage::file_io;

use super::blobs::BlobStore;

/// Name of the manifest file inside each backup directory
const MANIFEST_FILE: &str = "manifest.json";

/// What a restore did
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RestoreSummary {
    /// Files written back from blobs
    pub written: usize,
    /// Files removed because the backup recorded them as absent
    pub removed: usize,
}

/// What a prune did
#[derive(Debug, Clone, Default)]
pub struct PruneSummary {
    /// Backups deleted, oldest last
    pub removed: Vec<BackupId>,
    /// Blobs garbage-collected afterwards
    pub blobs_removed: usize,
}

/// Store managing the backup directory
#[derive(Debug, Clone)]
pub struct BackupStore {
    backup_dir: PathBuf,
    blobs: BlobStore,
}

impl BackupStore {
    /// Open a store over a backup directory (which need not exist yet)
    pub fn open(backup_dir: impl Into<PathBuf>) -> Self {
        let backup_dir = backup_dir.into();
        let blobs = BlobStore::new(backup_dir.join("objects"));
        Self { backup_dir, blobs }
    }

    /// The directory this store manages
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot the given project-relative paths
    ///
    /// Paths that do not exist are recorded as absent so a later restore
    /// can remove whatever the migration created there. The manifest is
    /// written atomically and synced; once this returns, the backup
    /// survives a crash.
    pub fn snapshot(&self, root: &Path, paths: &[PathBuf]) -> MigrateResult<BackupId> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            MigrateError::backup(format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        // The manifest keeps the full-precision clock; the id label is
        // truncated to milliseconds and may be bumped to stay unique
        let created_at = Utc::now();
        let id = self.next_id(created_at)?;

        let unique: BTreeSet<&PathBuf> = paths.iter().collect();
        let mut entries = Vec::with_capacity(unique.len());
        for rel in unique {
            let abs = root.join(rel);
            if abs.is_file() {
                let data = file_io::read_bytes(&abs).map_err(|e| {
                    MigrateError::backup(format!("Failed to read {}: {}", abs.display(), e))
                })?;
                let hash = self.blobs.put(&data)?;
                entries.push(ManifestEntry::present(rel.clone(), hash, data.len() as u64));
            } else {
                entries.push(ManifestEntry::absent(rel.clone()));
            }
        }

        let manifest = BackupManifest::new(id.clone(), created_at, root, entries);
        let manifest_path = self.backup_dir.join(id.as_str()).join(MANIFEST_FILE);
        file_io::write_json_atomic(&manifest_path, &manifest).map_err(|e| {
            MigrateError::backup(format!("Failed to write manifest for {}: {}", id, e))
        })?;

        Ok(id)
    }

    /// List all backups, newest first
    pub fn list(&self) -> MigrateResult<Vec<Backup>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            MigrateError::backup(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                MigrateError::backup(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let id = match path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(BackupId::parse)
            {
                Some(id) => id,
                None => continue,
            };

            // Entries whose manifest is unreadable are not listable backups
            let manifest: BackupManifest =
                match file_io::read_json_required(path.join(MANIFEST_FILE)) {
                    Ok(m) => m,
                    Err(_) => continue,
                };

            backups.push(Backup {
                id,
                path,
                created_at: manifest.created_at,
                entry_count: manifest.entries.len(),
                total_bytes: manifest.total_bytes(),
            });
        }

        // Sort by date, newest first
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Find the most recent backup, or the nearest one at-or-before a
    /// timestamp; never returns a backup newer than the request
    pub fn find(&self, at_or_before: Option<DateTime<Utc>>) -> MigrateResult<Option<Backup>> {
        let backups = self.list()?;
        Ok(match at_or_before {
            None => backups.into_iter().next(),
            Some(t) => backups.into_iter().find(|b| b.created_at <= t),
        })
    }

    /// Load a backup's manifest
    pub fn load_manifest(&self, id: &BackupId) -> MigrateResult<BackupManifest> {
        let path = self.backup_dir.join(id.as_str()).join(MANIFEST_FILE);
        file_io::read_json_required(&path).map_err(|e| {
            MigrateError::backup(format!("Failed to load manifest for {}: {}", id, e))
        })
    }

    /// Restore a backup into a root directory
    ///
    /// Every blob is resolved and verified before the first write, so a
    /// missing or corrupt blob fails the restore without touching the tree.
    /// Restoring is idempotent.
    pub fn restore(&self, id: &BackupId, root: &Path) -> MigrateResult<RestoreSummary> {
        let manifest = self
            .load_manifest(id)
            .map_err(|e| MigrateError::restore_io(e.to_string()))?;

        // Resolve everything first
        let mut payloads: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(manifest.entries.len());
        for entry in &manifest.entries {
            let payload = match &entry.blob {
                Some(hash) => Some(
                    self.blobs
                        .get(hash)
                        .map_err(|e| MigrateError::restore_io(e.to_string()))?,
                ),
                None => None,
            };
            payloads.push((entry.path.as_path(), payload));
        }

        // Then write
        let mut summary = RestoreSummary::default();
        for (rel, payload) in payloads {
            let abs = root.join(rel);
            match payload {
                Some(data) => {
                    file_io::write_atomic(&abs, &data)
                        .map_err(|e| MigrateError::restore_io(e.to_string()))?;
                    summary.written += 1;
                }
                None => {
                    let removed = file_io::remove_file_if_exists(&abs)
                        .map_err(|e| MigrateError::restore_io(e.to_string()))?;
                    if removed {
                        summary.removed += 1;
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Keep only the newest `keep` backups, then collect orphaned blobs
    pub fn prune(&self, keep: usize) -> MigrateResult<PruneSummary> {
        let backups = self.list()?;
        let mut summary = PruneSummary::default();

        for backup in backups.iter().skip(keep) {
            fs::remove_dir_all(&backup.path).map_err(|e| {
                MigrateError::backup(format!("Failed to delete backup {}: {}", backup.id, e))
            })?;
            summary.removed.push(backup.id.clone());
        }

        let mut referenced = HashSet::new();
        for backup in backups.iter().take(keep) {
            let manifest = self.load_manifest(&backup.id)?;
            referenced.extend(manifest.blob_refs().cloned());
        }
        summary.blobs_removed = self.blobs.gc(&referenced)?;

        Ok(summary)
    }

    /// For each path, when its content was most recently captured
    ///
    /// Absent-at-snapshot entries don't count; they record no content.
    pub fn last_captured(
        &self,
        paths: &[PathBuf],
    ) -> MigrateResult<HashMap<PathBuf, DateTime<Utc>>> {
        let wanted: HashSet<&PathBuf> = paths.iter().collect();
        let mut captured: HashMap<PathBuf, DateTime<Utc>> = HashMap::new();

        // Newest first, so the first capture seen per path wins
        for backup in self.list()? {
            if captured.len() == wanted.len() {
                break;
            }
            let manifest = self.load_manifest(&backup.id)?;
            for entry in &manifest.entries {
                if entry.blob.is_some()
                    && wanted.contains(&entry.path)
                    && !captured.contains_key(&entry.path)
                {
                    captured.insert(entry.path.clone(), manifest.created_at);
                }
            }
        }

        Ok(captured)
    }

    /// Derive a fresh id, bumping past the newest existing one if the
    /// clock hasn't moved since it was taken
    fn next_id(&self, now: DateTime<Utc>) -> MigrateResult<BackupId> {
        let mut id = BackupId::from_time(now);
        if let Some(latest) = self.latest_id()? {
            if id <= latest {
                id = latest.succ().ok_or_else(|| {
                    MigrateError::backup(format!("cannot derive an id after {}", latest))
                })?;
            }
        }
        Ok(id)
    }

    /// The lexically newest backup id on disk, if any
    fn latest_id(&self) -> MigrateResult<Option<BackupId>> {
        if !self.backup_dir.exists() {
            return Ok(None);
        }

        let mut latest: Option<BackupId> = None;
        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            MigrateError::backup(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                MigrateError::backup(format!("Failed to read directory entry: {}", e))
            })?;
            if let Some(id) = entry
                .path()
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(BackupId::parse)
            {
                if latest.as_ref().map_or(true, |l| id > *l) {
                    latest = Some(id);
                }
            }
        }
        Ok(latest)
    }
}
