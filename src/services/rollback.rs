//! Rollback orchestration
//!
//! Picks the backup to restore, restores it, and records the operation.
//! Resolution and blob verification complete before the first write, so
//! a failed rollback leaves the tree untouched.

use chrono::{DateTime, Utc};

use crate::audit::{HistoryEntry, HistoryLog};
use crate::backup::{BackupStore, RestoreSummary};
use crate::config::ProjectPaths;
use crate::error::{MigrateError, MigrateResult};
use crate::models::Backup;
use crate::report::Reporter;

pub struct RollbackManager<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> RollbackManager<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Restore the newest backup, or the newest one at-or-before a timestamp
    pub fn rollback(
        &self,
        paths: &ProjectPaths,
        at_or_before: Option<DateTime<Utc>>,
    ) -> MigrateResult<RestoreSummary> {
        let store = BackupStore::open(paths.backup_dir());
        let backup = self.resolve(&store, at_or_before)?;

        self.reporter.info(&format!(
            "Restoring backup {} ({} file(s))",
            backup.id, backup.entry_count
        ));

        let summary = store.restore(&backup.id, paths.root())?;

        self.reporter.info(&format!(
            "Restored {} file(s), removed {}",
            summary.written, summary.removed
        ));

        let history = HistoryLog::new(paths.history_log());
        if let Err(e) = history.log(&HistoryEntry::rollback(&backup.id, &summary)) {
            self.reporter
                .warn(&format!("could not record rollback in history: {}", e));
        }

        Ok(summary)
    }

    fn resolve(
        &self,
        store: &BackupStore,
        at_or_before: Option<DateTime<Utc>>,
    ) -> MigrateResult<Backup> {
        let found = store.find(at_or_before)?;
        found.ok_or_else(|| match at_or_before {
            Some(t) => MigrateError::no_backup_found(format!(
                "no backup at or before {}",
                t.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            None => MigrateError::no_backup_found("no backups exist yet"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollbackError;
    use crate::report::NullReporter;
    use chrono::Duration;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> ProjectPaths {
        ProjectPaths::new(temp.path())
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_rollback_without_backups_fails() {
        let temp = TempDir::new().unwrap();
        let paths = setup(&temp);
        let reporter = NullReporter;

        let err = RollbackManager::new(&reporter)
            .rollback(&paths, None)
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Rollback(RollbackError::NoBackupFound(_))
        ));
    }

    #[test]
    fn test_rollback_restores_latest() {
        let temp = TempDir::new().unwrap();
        let paths = setup(&temp);
        write(paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let store = BackupStore::open(paths.backup_dir());
        store
            .snapshot(paths.root(), &[".claude.json".into()])
            .unwrap();

        write(paths.root(), ".claude.json", "clobbered");

        let reporter = NullReporter;
        let summary = RollbackManager::new(&reporter)
            .rollback(&paths, None)
            .unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(
            fs::read_to_string(paths.root().join(".claude.json")).unwrap(),
            r#"{"model": "opus"}"#
        );

        let history = HistoryLog::new(paths.history_log());
        assert_eq!(history.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_rollback_before_first_backup_fails() {
        let temp = TempDir::new().unwrap();
        let paths = setup(&temp);
        write(paths.root(), ".claude.json", "{}");

        let store = BackupStore::open(paths.backup_dir());
        let id = store
            .snapshot(paths.root(), &[".claude.json".into()])
            .unwrap();
        let created = id.timestamp().unwrap();

        let reporter = NullReporter;
        let err = RollbackManager::new(&reporter)
            .rollback(&paths, Some(created - Duration::hours(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Rollback(RollbackError::NoBackupFound(_))
        ));
    }
}
