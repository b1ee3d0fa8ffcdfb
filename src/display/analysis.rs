//! Analysis display formatting
//!
//! Formats analyses and plans for terminal output.

use crate::display::backups::format_size;
use crate::models::{Analysis, ConfigArtifact, MigrationPlan, Risk};

/// Format the one-screen analysis summary
pub fn format_analysis_summary(analysis: &Analysis) -> String {
    let counts = analysis.counts();
    let plan_counts = analysis.plan.counts();

    let mut output = String::new();

    output.push_str(&format!(
        "Project: {}\n",
        analysis.project_root.display()
    ));
    output.push_str(&format!(
        "Scanned: {}\n",
        analysis.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push('\n');

    output.push_str(&format!(
        "Artifacts: {} total ({} legacy, {} current, {} custom, {} unknown)\n",
        counts.total(),
        counts.legacy,
        counts.current,
        counts.custom,
        counts.unknown,
    ));
    output.push_str(&format!(
        "Readiness: {:.0}%\n",
        analysis.readiness_score * 100.0
    ));
    output.push_str(&format!(
        "Plan: {} action(s), {} of them mutations\n",
        plan_counts.total(),
        plan_counts.mutating(),
    ));

    if analysis.is_fully_current() {
        output.push('\n');
        output.push_str("Nothing to migrate.\n");
    }

    output
}

/// Format discovered artifacts as a table
pub fn format_artifact_list(artifacts: &[ConfigArtifact]) -> String {
    if artifacts.is_empty() {
        return "No configuration artifacts found.\n".to_string();
    }

    let path_width = artifacts
        .iter()
        .map(|a| a.path.display().to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<path_width$}  {:<8}  {:>9}  {}\n",
        "Path",
        "Kind",
        "Size",
        "Hash",
        path_width = path_width,
    ));
    output.push_str(&format!(
        "{:-<path_width$}  {:-<8}  {:->9}  {:-<8}\n",
        "",
        "",
        "",
        "",
        path_width = path_width,
    ));

    for artifact in artifacts {
        output.push_str(&format!(
            "{:<path_width$}  {:<8}  {:>9}  {}\n",
            artifact.path.display().to_string(),
            artifact.kind.to_string(),
            format_size(artifact.size_bytes),
            artifact.content_hash.short(),
            path_width = path_width,
        ));
    }

    output
}

/// Format a plan's actions as a table
pub fn format_plan(plan: &MigrationPlan) -> String {
    if plan.actions().is_empty() {
        return "Empty plan.\n".to_string();
    }

    let path_width = plan
        .actions()
        .iter()
        .map(|a| a.target.display().to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<9}  {:<path_width$}  {}\n",
        "Action",
        "Path",
        "Reason",
        path_width = path_width,
    ));
    output.push_str(&format!(
        "{:-<9}  {:-<path_width$}  {:-<30}\n",
        "",
        "",
        "",
        path_width = path_width,
    ));

    for action in plan.actions() {
        output.push_str(&format!(
            "{:<9}  {:<path_width$}  {}\n",
            action.kind.to_string(),
            action.target.display().to_string(),
            action.reason,
            path_width = path_width,
        ));
    }

    output
}

/// Format risks as a bulleted list
pub fn format_risk_list(risks: &[Risk]) -> String {
    if risks.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&format!("Risks ({}):\n", risks.len()));
    for risk in risks {
        output.push_str(&format!("  - {}\n", risk));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtifactKind, MigrationAction, MigrationStrategy, RiskKind};
    use std::path::PathBuf;

    fn sample_analysis() -> Analysis {
        let artifacts = vec![
            ConfigArtifact::new(".claude.json", ArtifactKind::Legacy, b"{}"),
            ConfigArtifact::new("CLAUDE.md", ArtifactKind::Current, b"# p\n"),
        ];
        let plan = MigrationPlan::new(
            MigrationStrategy::Selective,
            vec![
                MigrationAction::create(".claude/settings.json", "{}", "converted"),
                MigrationAction::delete(".claude.json", "relocated"),
            ],
        )
        .unwrap();
        let risks = vec![Risk::new(
            RiskKind::UnknownFormat,
            PathBuf::from("odd.bin"),
            "unrecognized",
        )];
        Analysis::new("/tmp/project", artifacts, plan, risks)
    }

    #[test]
    fn test_format_analysis_summary() {
        let output = format_analysis_summary(&sample_analysis());
        assert!(output.contains("2 total"));
        assert!(output.contains("1 legacy"));
        assert!(output.contains("Readiness: 50%"));
        assert!(output.contains("2 of them mutations"));
    }

    #[test]
    fn test_format_artifact_list() {
        let analysis = sample_analysis();
        let output = format_artifact_list(&analysis.artifacts);
        assert!(output.contains(".claude.json"));
        assert!(output.contains("legacy"));
        assert!(output.contains("current"));
    }

    #[test]
    fn test_format_empty_artifact_list() {
        let output = format_artifact_list(&[]);
        assert!(output.contains("No configuration artifacts found"));
    }

    #[test]
    fn test_format_plan() {
        let analysis = sample_analysis();
        let output = format_plan(&analysis.plan);
        assert!(output.contains("create"));
        assert!(output.contains("delete"));
        assert!(output.contains(".claude/settings.json"));
        // Deletes come first in plan order
        let delete_pos = output.find("delete").unwrap();
        let create_pos = output.find("create").unwrap();
        assert!(delete_pos < create_pos);
    }

    #[test]
    fn test_format_risk_list() {
        let analysis = sample_analysis();
        let output = format_risk_list(&analysis.risks);
        assert!(output.contains("Risks (1)"));
        assert!(output.contains("odd.bin"));

        assert!(format_risk_list(&[]).is_empty());
    }

    #[test]
    fn test_noop_analysis_says_so() {
        let artifacts = vec![ConfigArtifact::new(
            "CLAUDE.md",
            ArtifactKind::Current,
            b"# p\n",
        )];
        let plan = MigrationPlan::new(
            MigrationStrategy::Selective,
            vec![MigrationAction::skip("CLAUDE.md", "already current")],
        )
        .unwrap();
        let analysis = Analysis::new("/tmp/project", artifacts, plan, Vec::new());
        let output = format_analysis_summary(&analysis);
        assert!(output.contains("Nothing to migrate"));
    }
}
