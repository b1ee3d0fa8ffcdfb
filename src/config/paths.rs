//! Path management for claude-migrate
//!
//! All engine paths hang off two anchors: the project root being migrated
//! and the backup directory. A relative backup directory is resolved
//! against the project root, so `--backup .claude-backup` lands inside the
//! project no matter where the tool is invoked from.

use std::path::{Path, PathBuf};

use crate::error::{MigrateError, MigrateResult};

/// Default backup directory name, relative to the project root
pub const DEFAULT_BACKUP_DIR: &str = ".claude-backup";

/// Manages all paths used by a single migration run
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    /// Root of the project tree being migrated
    root: PathBuf,
    /// Directory holding backups, the blob pool, and the run history
    backup_dir: PathBuf,
}

impl ProjectPaths {
    /// Create paths for a project root with the default backup directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let backup_dir = root.join(DEFAULT_BACKUP_DIR);
        Self { root, backup_dir }
    }

    /// Create paths with an explicit backup directory
    ///
    /// A relative `backup_dir` is resolved against the project root.
    pub fn with_backup_dir(root: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let backup_dir = backup_dir.into();
        let backup_dir = if backup_dir.is_absolute() {
            backup_dir
        } else {
            root.join(backup_dir)
        };
        Self { root, backup_dir }
    }

    /// Get the project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get the content-addressed object pool directory
    pub fn objects_dir(&self) -> PathBuf {
        self.backup_dir.join("objects")
    }

    /// Get the path to the run history log
    pub fn history_log(&self) -> PathBuf {
        self.backup_dir.join("history.log")
    }

    /// Resolve a project-relative path to an absolute one
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Check that the project root exists and is a directory
    pub fn check_root(&self) -> MigrateResult<()> {
        if !self.root.is_dir() {
            return Err(MigrateError::analysis(format!(
                "project root does not exist or is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Ensure the backup directory and object pool exist
    pub fn ensure_backup_dirs(&self) -> MigrateResult<()> {
        std::fs::create_dir_all(&self.backup_dir).map_err(|e| {
            MigrateError::backup(format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        std::fs::create_dir_all(self.objects_dir()).map_err(|e| {
            MigrateError::backup(format!("Failed to create object pool directory: {}", e))
        })?;

        Ok(())
    }
}
