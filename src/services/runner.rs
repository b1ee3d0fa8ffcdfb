//! Migration execution
//!
//! Applies a plan against a project tree. The order of operations is
//! fixed: resolve the effective plan (the preserve-custom override),
//! check for writes that would clobber uncaptured edits, take the
//! write-ahead backup, mutate, validate. Nothing mutates until the
//! backup is durable, so any run is reversible.

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::{HistoryEntry, HistoryLog};
use crate::backup::BackupStore;
use crate::config::{ProjectPaths, RunOptions};
use crate::error::{MigrateError, MigrateResult};
use crate::models::{
    ActionError, ActionKind, Backup, MigrationAction, MigrationPlan, MigrationResult,
};
use crate::report::{Confirm, Reporter};
use crate::rules::Ruleset;
use crate::services::rollback::RollbackManager;
use crate::services::validator::Validator;
use crate::storage::file_io;

pub struct Runner<'a> {
    paths: &'a ProjectPaths,
    rules: &'a dyn Ruleset,
    reporter: &'a dyn Reporter,
    confirm: &'a dyn Confirm,
}

impl<'a> Runner<'a> {
    pub fn new(
        paths: &'a ProjectPaths,
        rules: &'a dyn Ruleset,
        reporter: &'a dyn Reporter,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            paths,
            rules,
            reporter,
            confirm,
        }
    }

    /// Execute a plan
    ///
    /// A dry run computes exactly what a real run would, reports it, and
    /// touches nothing. A real run backs up every to-be-mutated path
    /// first and aborts with zero mutations if that backup cannot be
    /// made durable. Individual action failures are collected in the
    /// result; they never abort the remaining actions.
    pub fn run(&self, plan: &MigrationPlan, options: &RunOptions) -> MigrateResult<MigrationResult> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        self.paths.check_root()?;

        let plan = self.effective_plan(plan, options)?;
        let store = BackupStore::open(self.paths.backup_dir());

        let risky = self.uncaptured_targets(&plan, &store)?;
        if !risky.is_empty() && !options.force {
            if options.dry_run {
                self.reporter.warn(&format!(
                    "{} file(s) changed since their last backup and would need confirmation",
                    risky.len()
                ));
            } else if !self.confirm.confirm(
                "These files changed since their last backup and will be replaced or removed",
                &risky,
            ) {
                return Err(MigrateError::ConfirmationRequired { paths: risky });
            }
        }

        let touched: Vec<PathBuf> = plan
            .mutating_actions()
            .map(|a| a.target.clone())
            .collect();

        if options.dry_run {
            return Ok(self.dry_run_result(run_id, started_at, &plan, &touched));
        }

        let backup = if touched.is_empty() {
            None
        } else {
            let id = store.snapshot(self.paths.root(), &touched).map_err(|e| match e {
                MigrateError::Backup(_) => e,
                other => MigrateError::backup(format!("backup creation failed: {}", other)),
            })?;
            self.reporter
                .info(&format!("Backed up {} path(s) as {}", touched.len(), id));
            Some(id)
        };

        let (applied, skipped, errors) = self.apply(&plan);

        let validation_passed = if options.skip_validation {
            None
        } else {
            Some(self.validate_run(&plan))
        };

        let result = MigrationResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            strategy: plan.strategy(),
            dry_run: false,
            applied,
            skipped,
            errors,
            backup,
            validation_passed,
        };

        let history = HistoryLog::new(self.paths.history_log());
        if let Err(e) = history.log(&HistoryEntry::migrate(&result)) {
            self.reporter
                .warn(&format!("could not record migration in history: {}", e));
        }

        Ok(result)
    }

    /// Restore the project from a backup in this runner's backup directory
    pub fn rollback(&self, at_or_before: Option<chrono::DateTime<Utc>>) -> MigrateResult<()> {
        RollbackManager::new(self.reporter)
            .rollback(self.paths, at_or_before)?;
        Ok(())
    }

    /// Check the project tree; true when no legacy artifacts remain
    pub fn validate(&self, verbose: bool) -> MigrateResult<bool> {
        let report =
            Validator::new(self.rules, self.reporter).validate(self.paths.root(), None)?;

        if verbose {
            for issue in &report.issues {
                self.reporter.detail(&issue.to_string());
            }
        }
        self.reporter.info(&format!(
            "Checked {} artifact(s), {} issue(s)",
            report.artifacts_scanned,
            report.issues.len()
        ));

        Ok(report.passed())
    }

    /// Backups in this runner's backup directory, newest first
    pub fn list_backups(&self) -> MigrateResult<Vec<Backup>> {
        BackupStore::open(self.paths.backup_dir()).list()
    }

    /// The plan as it will actually execute
    ///
    /// preserve_custom downgrades every mutation of a custom-classified
    /// artifact to a skip. This runs after strategy resolution; it is a
    /// hard override, not a strategy input.
    fn effective_plan(
        &self,
        plan: &MigrationPlan,
        options: &RunOptions,
    ) -> MigrateResult<MigrationPlan> {
        if !options.preserve_custom {
            return Ok(plan.clone());
        }

        let actions = plan
            .actions()
            .iter()
            .map(|action| {
                if action.is_mutating() && action.targets_custom() {
                    let mut skip = MigrationAction::skip(
                        action.target.clone(),
                        "user-authored artifact preserved",
                    );
                    skip.prior_kind = action.prior_kind;
                    skip.prior_hash = action.prior_hash.clone();
                    skip
                } else {
                    action.clone()
                }
            })
            .collect();

        MigrationPlan::new(plan.strategy(), actions)
    }

    /// Mutation targets whose on-disk content no backup has captured
    ///
    /// A file counts when it exists, a replace or delete is planned for
    /// it, and it was modified after the newest backup that captured it
    /// (or was never captured at all).
    fn uncaptured_targets(
        &self,
        plan: &MigrationPlan,
        store: &BackupStore,
    ) -> MigrateResult<Vec<PathBuf>> {
        let candidates: Vec<&MigrationAction> = plan
            .actions()
            .iter()
            .filter(|a| {
                matches!(
                    a.kind,
                    ActionKind::Overwrite | ActionKind::Delete | ActionKind::Create
                )
            })
            .collect();

        let targets: Vec<PathBuf> = candidates.iter().map(|a| a.target.clone()).collect();
        let captured = store.last_captured(&targets)?;

        let mut risky = Vec::new();
        for action in candidates {
            let abs = self.paths.resolve(&action.target);
            if !abs.is_file() {
                continue;
            }
            let at_risk = match captured.get(&action.target) {
                None => true,
                Some(capture_time) => file_io::modified_time(&abs)? > *capture_time,
            };
            if at_risk {
                risky.push(action.target.clone());
            }
        }
        risky.sort();
        Ok(risky)
    }

    fn dry_run_result(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        plan: &MigrationPlan,
        touched: &[PathBuf],
    ) -> MigrationResult {
        let (would_apply, skipped): (Vec<_>, Vec<_>) = plan
            .actions()
            .iter()
            .cloned()
            .partition(|a| a.is_mutating());

        self.reporter.info(&format!(
            "Dry run: {} action(s) would be applied, {} path(s) would be backed up",
            would_apply.len(),
            touched.len()
        ));
        for action in &would_apply {
            self.reporter
                .detail(&format!("would {} {}", action.kind, action.target.display()));
        }

        MigrationResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            strategy: plan.strategy(),
            dry_run: true,
            applied: would_apply,
            skipped,
            errors: Vec::new(),
            backup: None,
            validation_passed: None,
        }
    }

    /// Apply actions in plan order, collecting per-action failures
    fn apply(
        &self,
        plan: &MigrationPlan,
    ) -> (Vec<MigrationAction>, Vec<MigrationAction>, Vec<ActionError>) {
        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        let mut errors = Vec::new();

        for action in plan.actions().iter().cloned() {
            if !action.is_mutating() {
                self.reporter.detail(&format!(
                    "skip {}: {}",
                    action.target.display(),
                    action.reason
                ));
                skipped.push(action);
                continue;
            }

            match self.apply_action(&action) {
                Ok(()) => {
                    self.reporter
                        .detail(&format!("{} {}", action.kind, action.target.display()));
                    applied.push(action);
                }
                Err(e) => {
                    self.reporter.warn(&format!(
                        "{} {} failed: {}",
                        action.kind,
                        action.target.display(),
                        e
                    ));
                    errors.push(ActionError::new(&action, e.to_string()));
                }
            }
        }

        (applied, skipped, errors)
    }

    fn apply_action(&self, action: &MigrationAction) -> MigrateResult<()> {
        let abs = self.paths.resolve(&action.target);
        match action.kind {
            ActionKind::Create | ActionKind::Overwrite | ActionKind::Merge => {
                let content = action.content.as_deref().ok_or_else(|| {
                    MigrateError::Config(format!(
                        "write action for {} carries no content",
                        action.target.display()
                    ))
                })?;
                file_io::write_atomic(&abs, content.as_bytes())
            }
            ActionKind::Delete => {
                file_io::remove_file_if_exists(&abs)?;
                Ok(())
            }
            ActionKind::Skip => Ok(()),
        }
    }

    /// Post-run check; a validation that cannot run counts as failed
    fn validate_run(&self, plan: &MigrationPlan) -> bool {
        match Validator::new(self.rules, self.reporter).validate(self.paths.root(), Some(plan)) {
            Ok(report) => {
                for issue in &report.issues {
                    self.reporter.warn(&issue.to_string());
                }
                report.passed()
            }
            Err(e) => {
                self.reporter
                    .warn(&format!("validation could not run: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MigrationStrategy;
    use crate::report::{AllowAll, DenyAll, NullReporter};
    use crate::rules::ClaudeRules;
    use crate::services::analyzer::Analyzer;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        paths: ProjectPaths,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp.path());
        Fixture { _temp: temp, paths }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn plan_for(paths: &ProjectPaths, strategy: MigrationStrategy) -> MigrationPlan {
        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        Analyzer::new(&rules, &reporter)
            .analyze(paths.root(), strategy)
            .unwrap()
            .plan
    }

    fn run(
        paths: &ProjectPaths,
        plan: &MigrationPlan,
        options: &RunOptions,
    ) -> MigrateResult<MigrationResult> {
        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        let confirm = AllowAll;
        Runner::new(paths, &rules, &reporter, &confirm).run(plan, options)
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let result = run(&f.paths, &plan, &RunOptions::dry_run()).unwrap();

        assert!(result.dry_run);
        assert_eq!(result.applied.len(), 2);
        assert!(result.backup.is_none());
        assert!(result.validation_passed.is_none());

        // Tree untouched, no backup dir, no history
        assert!(f.paths.root().join(".claude.json").is_file());
        assert!(!f.paths.root().join(".claude/settings.json").exists());
        assert!(!f.paths.backup_dir().exists());
    }

    #[test]
    fn test_run_applies_backs_up_and_validates() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };
        let result = run(&f.paths, &plan, &options).unwrap();

        assert!(result.succeeded());
        assert_eq!(result.applied.len(), 2);
        assert!(result.errors.is_empty());
        assert_eq!(result.validation_passed, Some(true));
        assert!(result.backup.is_some());

        assert!(!f.paths.root().join(".claude.json").exists());
        let migrated =
            fs::read_to_string(f.paths.root().join(".claude/settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&migrated).unwrap();
        assert_eq!(value["version"], serde_json::Value::from(2));

        let history = HistoryLog::new(f.paths.history_log());
        assert_eq!(history.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_backup_failure_means_zero_mutations() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);
        // Occupy the backup directory path with a file
        fs::write(f.paths.backup_dir(), "not a directory").unwrap();

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };
        let err = run(&f.paths, &plan, &options).unwrap_err();

        assert!(err.is_backup());
        assert!(f.paths.root().join(".claude.json").is_file());
        assert!(!f.paths.root().join(".claude/settings.json").exists());
    }

    #[test]
    fn test_preserve_custom_downgrades_mutations() {
        let f = fixture();
        write(
            f.paths.root(),
            ".claude/settings.local.json",
            r#"{"theme": "dark"}"#,
        );

        let plan = plan_for(&f.paths, MigrationStrategy::Full);
        assert!(plan
            .actions()
            .iter()
            .any(|a| a.kind == ActionKind::Overwrite));

        let options = RunOptions {
            force: true,
            preserve_custom: true,
            ..RunOptions::default()
        };
        let result = run(&f.paths, &plan, &options).unwrap();

        assert!(result.applied.is_empty());
        assert!(result
            .skipped
            .iter()
            .any(|a| a.target == PathBuf::from(".claude/settings.local.json")));
        assert_eq!(
            fs::read_to_string(f.paths.root().join(".claude/settings.local.json")).unwrap(),
            r#"{"theme": "dark"}"#
        );
    }

    #[test]
    fn test_uncaptured_edits_need_confirmation() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let rules = ClaudeRules::new();
        let reporter = NullReporter;

        // The delete target has never been captured by any backup
        let denied = Runner::new(&f.paths, &rules, &reporter, &DenyAll)
            .run(&plan, &RunOptions::default())
            .unwrap_err();
        match denied {
            MigrateError::ConfirmationRequired { paths } => {
                assert_eq!(paths, vec![PathBuf::from(".claude.json")]);
            }
            other => panic!("expected ConfirmationRequired, got {other}"),
        }
        assert!(f.paths.root().join(".claude.json").is_file());

        // Granting confirmation lets the same run proceed
        let result = Runner::new(&f.paths, &rules, &reporter, &AllowAll)
            .run(&plan, &RunOptions::default())
            .unwrap();
        assert!(result.succeeded());
        assert!(!f.paths.root().join(".claude.json").exists());
    }

    #[test]
    fn test_force_bypasses_confirmation() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };
        let result = Runner::new(&f.paths, &rules, &reporter, &DenyAll)
            .run(&plan, &options)
            .unwrap();
        assert!(result.succeeded());
    }

    #[test]
    fn test_captured_unmodified_targets_need_no_confirmation() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        // Capture the file, then leave it untouched
        let store = BackupStore::open(f.paths.backup_dir());
        store
            .snapshot(f.paths.root(), &[".claude.json".into()])
            .unwrap();

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        let result = Runner::new(&f.paths, &rules, &reporter, &DenyAll)
            .run(&plan, &RunOptions::default())
            .unwrap();
        assert!(result.succeeded());
    }

    #[test]
    fn test_action_failures_are_independent() {
        let f = fixture();

        // One good write and one delete that cannot succeed because the
        // path is a directory
        fs::create_dir_all(f.paths.root().join("CLAUDE.md")).unwrap();
        let plan = MigrationPlan::new(
            MigrationStrategy::Selective,
            vec![
                MigrationAction::create(
                    ".claude/settings.json",
                    "{\n  \"version\": 2\n}\n",
                    "converted",
                ),
                MigrationAction::delete("CLAUDE.md", "superseded"),
            ],
        )
        .unwrap();

        let options = RunOptions {
            force: true,
            skip_validation: true,
            ..RunOptions::default()
        };
        let result = run(&f.paths, &plan, &options).unwrap();

        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.succeeded());
        assert!(f.paths.root().join(".claude/settings.json").is_file());
    }

    #[test]
    fn test_migrate_then_rollback_round_trip() {
        let f = fixture();
        let original = r#"{"model": "opus", "theme": "dark"}"#;
        write(f.paths.root(), ".claude.json", original);
        write(f.paths.root(), "CLAUDE.local.md", "# mine\n");

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        let runner = Runner::new(&f.paths, &rules, &reporter, &AllowAll);

        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };
        let result = runner.run(&plan, &options).unwrap();
        assert!(result.succeeded());
        assert!(f.paths.root().join(".claude/settings.json").is_file());
        assert!(!f.paths.root().join(".claude.json").exists());

        runner.rollback(None).unwrap();

        assert_eq!(
            fs::read_to_string(f.paths.root().join(".claude.json")).unwrap(),
            original
        );
        // The file the migration created is removed again
        assert!(!f.paths.root().join(".claude/settings.json").exists());
        assert_eq!(
            fs::read_to_string(f.paths.root().join("CLAUDE.local.md")).unwrap(),
            "# mine\n"
        );
    }

    #[test]
    fn test_noop_plan_takes_no_backup() {
        let f = fixture();
        write(f.paths.root(), ".claude/settings.json", r#"{"version": 2}"#);

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        assert!(plan.is_noop());

        let result = run(&f.paths, &plan, &RunOptions::default()).unwrap();
        assert!(result.succeeded());
        assert!(result.backup.is_none());
        assert!(result.applied.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn test_validate_and_list_backups_delegate() {
        let f = fixture();
        write(f.paths.root(), ".claude.json", r#"{"model": "opus"}"#);

        let rules = ClaudeRules::new();
        let reporter = NullReporter;
        let runner = Runner::new(&f.paths, &rules, &reporter, &AllowAll);

        assert!(!runner.validate(false).unwrap());
        assert!(runner.list_backups().unwrap().is_empty());

        let plan = plan_for(&f.paths, MigrationStrategy::Selective);
        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };
        runner.run(&plan, &options).unwrap();

        assert!(runner.validate(true).unwrap());
        assert_eq!(runner.list_backups().unwrap().len(), 1);
    }
}
