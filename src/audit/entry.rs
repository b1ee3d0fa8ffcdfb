//! Run history entry data structures
//!
//! Defines the structure of history log entries recording what each
//! migration, rollback, or prune did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backup::{PruneSummary, RestoreSummary};
use crate::models::{BackupId, MigrationResult, MigrationStrategy};

/// Types of operations recorded in the run history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A migration run was executed
    Migrate,
    /// A backup was restored
    Rollback,
    /// Old backups were pruned
    Prune,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Migrate => write!(f, "MIGRATE"),
            OperationKind::Rollback => write!(f, "ROLLBACK"),
            OperationKind::Prune => write!(f, "PRUNE"),
        }
    }
}

/// A single run history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry
    pub id: Uuid,

    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// What kind of operation ran
    pub operation: OperationKind,

    /// Strategy used, for migrations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MigrationStrategy>,

    /// Backup created (migrations) or restored (rollbacks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupId>,

    /// Actions applied, files restored, or backups removed
    pub applied: usize,

    /// Actions skipped
    pub skipped: usize,

    /// Actions that failed
    pub errors: usize,

    /// Validation verdict, when validation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_passed: Option<bool>,

    /// Free-form summary line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HistoryEntry {
    /// Entry for a completed migration run
    pub fn migrate(result: &MigrationResult) -> Self {
        Self {
            id: result.run_id,
            timestamp: result.finished_at,
            operation: OperationKind::Migrate,
            strategy: Some(result.strategy),
            backup: result.backup.clone(),
            applied: result.applied.len(),
            skipped: result.skipped.len(),
            errors: result.errors.len(),
            validation_passed: result.validation_passed,
            detail: None,
        }
    }

    /// Entry for a completed rollback
    pub fn rollback(backup: &BackupId, summary: &RestoreSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation: OperationKind::Rollback,
            strategy: None,
            backup: Some(backup.clone()),
            applied: summary.written,
            skipped: 0,
            errors: 0,
            validation_passed: None,
            detail: Some(format!(
                "restored {} file(s), removed {} file(s)",
                summary.written, summary.removed
            )),
        }
    }

    /// Entry for a completed prune
    pub fn prune(summary: &PruneSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation: OperationKind::Prune,
            strategy: None,
            backup: None,
            applied: summary.removed.len(),
            skipped: 0,
            errors: 0,
            validation_passed: None,
            detail: Some(format!(
                "removed {} backup(s) and {} orphaned blob(s)",
                summary.removed.len(),
                summary.blobs_removed
            )),
        }
    }
}
