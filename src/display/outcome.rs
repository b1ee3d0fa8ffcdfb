//! Migration result display formatting

use crate::models::MigrationResult;

/// Format the outcome of a run, dry or real
pub fn format_result(result: &MigrationResult) -> String {
    let mut output = String::new();

    if result.dry_run {
        output.push_str(&format!(
            "Dry run: {} action(s) would be applied, {} skipped\n",
            result.applied.len(),
            result.skipped.len()
        ));
        for action in &result.applied {
            output.push_str(&format!(
                "  would {} {} ({})\n",
                action.kind,
                action.target.display(),
                action.reason
            ));
        }
        return output;
    }

    output.push_str(&format!(
        "Applied {} action(s), skipped {}\n",
        result.applied.len(),
        result.skipped.len()
    ));
    for action in &result.applied {
        output.push_str(&format!(
            "  {} {}\n",
            action.kind,
            action.target.display()
        ));
    }

    if let Some(backup) = &result.backup {
        output.push_str(&format!("Backup: {}\n", backup));
    }

    match result.validation_passed {
        Some(true) => output.push_str("Validation: passed\n"),
        Some(false) => output.push_str("Validation: FAILED\n"),
        None => output.push_str("Validation: skipped\n"),
    }

    if !result.errors.is_empty() {
        output.push('\n');
        output.push_str(&format!("Errors ({}):\n", result.errors.len()));
        for error in &result.errors {
            output.push_str(&format!("  - {}\n", error));
        }
        if let Some(backup) = &result.backup {
            output.push_str(&format!(
                "\nThe partial migration can be reversed with: claude-migrate rollback --timestamp {}\n",
                backup
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionError, BackupId, MigrationAction, MigrationStrategy};
    use chrono::Utc;
    use uuid::Uuid;

    fn base_result() -> MigrationResult {
        MigrationResult {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            strategy: MigrationStrategy::Selective,
            dry_run: false,
            applied: vec![MigrationAction::delete(".claude.json", "relocated")],
            skipped: vec![MigrationAction::skip("CLAUDE.md", "already current")],
            errors: Vec::new(),
            backup: BackupId::parse("20260101-120000-000"),
            validation_passed: Some(true),
        }
    }

    #[test]
    fn test_format_successful_result() {
        let output = format_result(&base_result());
        assert!(output.contains("Applied 1 action(s), skipped 1"));
        assert!(output.contains("delete .claude.json"));
        assert!(output.contains("Backup: 20260101-120000-000"));
        assert!(output.contains("Validation: passed"));
        assert!(!output.contains("Errors"));
    }

    #[test]
    fn test_format_dry_run() {
        let mut result = base_result();
        result.dry_run = true;
        result.backup = None;
        result.validation_passed = None;

        let output = format_result(&result);
        assert!(output.contains("Dry run"));
        assert!(output.contains("would delete .claude.json"));
        assert!(!output.contains("Backup:"));
    }

    #[test]
    fn test_format_result_with_errors() {
        let mut result = base_result();
        let failed = MigrationAction::create(".claude/settings.json", "{}", "converted");
        result.errors = vec![ActionError::new(&failed, "permission denied")];
        result.validation_passed = Some(false);

        let output = format_result(&result);
        assert!(output.contains("Errors (1)"));
        assert!(output.contains("permission denied"));
        assert!(output.contains("Validation: FAILED"));
        assert!(output.contains("rollback --timestamp"));
    }
}
