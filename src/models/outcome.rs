//! Migration result model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::backup::BackupId;
use super::plan::{ActionKind, MigrationAction};
use super::strategy::MigrationStrategy;

/// A mutation that failed; recorded, never thrown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionError {
    /// What the action was trying to do
    pub kind: ActionKind,
    /// The path it targeted
    pub target: PathBuf,
    /// Why it failed
    pub cause: String,
}

impl ActionError {
    pub fn new(action: &MigrationAction, cause: impl Into<String>) -> Self {
        Self {
            kind: action.kind,
            target: action.target.clone(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.target.display(), self.cause)
    }
}

/// What one run of the migration runner did (or, on a dry run, would do)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Unique identifier for this run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Strategy the executed plan was built with
    pub strategy: MigrationStrategy,

    /// Whether this was a dry run (nothing was mutated)
    pub dry_run: bool,

    /// Actions applied, in execution order; on a dry run, what would apply
    pub applied: Vec<MigrationAction>,

    /// Actions skipped, including downgrades from preserve-custom
    pub skipped: Vec<MigrationAction>,

    /// Mutations that failed; the rest of the plan still ran
    pub errors: Vec<ActionError>,

    /// The write-ahead backup taken before mutating; absent on dry runs
    pub backup: Option<BackupId>,

    /// Post-migration validation verdict; None when validation did not run
    pub validation_passed: Option<bool>,
}

impl MigrationResult {
    /// Whether the run completed with no recorded errors and no failed validation
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty() && self.validation_passed != Some(false)
    }

    /// Total actions the runner considered
    pub fn total_actions(&self) -> usize {
        self.applied.len() + self.skipped.len() + self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_result() -> MigrationResult {
        let now = Utc::now();
        MigrationResult {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            strategy: MigrationStrategy::Selective,
            dry_run: false,
            applied: vec![],
            skipped: vec![],
            errors: vec![],
            backup: None,
            validation_passed: None,
        }
    }

    #[test]
    fn test_succeeded() {
        let mut result = empty_result();
        assert!(result.succeeded());

        result.validation_passed = Some(true);
        assert!(result.succeeded());

        result.validation_passed = Some(false);
        assert!(!result.succeeded());

        result.validation_passed = Some(true);
        result.errors.push(ActionError {
            kind: ActionKind::Delete,
            target: PathBuf::from("a.json"),
            cause: "permission denied".into(),
        });
        assert!(!result.succeeded());
    }

    #[test]
    fn test_action_error_display() {
        let action = MigrationAction::delete("old.json", "superseded");
        let err = ActionError::new(&action, "permission denied");
        assert_eq!(err.to_string(), "delete old.json: permission denied");
    }

    #[test]
    fn test_total_actions() {
        let mut result = empty_result();
        result.applied.push(MigrationAction::create("a", "x", ""));
        result.skipped.push(MigrationAction::skip("b", ""));
        assert_eq!(result.total_actions(), 2);
    }
}
