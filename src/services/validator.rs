//! Post-migration validation
//!
//! Re-scans the project and checks it against expectations. With a plan,
//! each action's outcome is asserted; without one, the check is simply
//! that no legacy artifacts remain. Findings are data, never errors, so
//! a failed validation still reports the full picture.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MigrateResult;
use crate::models::{ActionKind, ArtifactKind, MigrationPlan};
use crate::report::Reporter;
use crate::rules::Ruleset;
use crate::services::analyzer::scan_project;

/// One failed post-condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A write action's target is missing from the tree
    MissingTarget { path: PathBuf, action: ActionKind },

    /// A write action's target exists but does not classify as current
    NotCurrent { path: PathBuf, found: ArtifactKind },

    /// A delete action's target still exists
    StillPresent { path: PathBuf },

    /// A skipped artifact's content changed during the run
    SkippedChanged { path: PathBuf },

    /// A legacy artifact remains in the tree
    LegacyRemains { path: PathBuf },
}

impl ValidationIssue {
    pub fn path(&self) -> &Path {
        match self {
            Self::MissingTarget { path, .. }
            | Self::NotCurrent { path, .. }
            | Self::StillPresent { path }
            | Self::SkippedChanged { path }
            | Self::LegacyRemains { path } => path,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget { path, action } => {
                write!(f, "{}: expected after {}, but missing", path.display(), action)
            }
            Self::NotCurrent { path, found } => {
                write!(f, "{}: expected current format, found {}", path.display(), found)
            }
            Self::StillPresent { path } => {
                write!(f, "{}: expected removed, but still present", path.display())
            }
            Self::SkippedChanged { path } => {
                write!(f, "{}: skipped, but content changed during the run", path.display())
            }
            Self::LegacyRemains { path } => {
                write!(f, "{}: legacy format remains", path.display())
            }
        }
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Root that was checked
    pub project_root: PathBuf,

    /// How many artifacts the check scanned
    pub artifacts_scanned: usize,

    /// Every failed post-condition, sorted by path
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks a tree against a plan's promises, or for remaining legacy content
pub struct Validator<'a> {
    rules: &'a dyn Ruleset,
    reporter: &'a dyn Reporter,
}

impl<'a> Validator<'a> {
    pub fn new(rules: &'a dyn Ruleset, reporter: &'a dyn Reporter) -> Self {
        Self { rules, reporter }
    }

    /// Scan and assert; pass a plan to check its specific outcomes
    pub fn validate(
        &self,
        root: &Path,
        expected: Option<&MigrationPlan>,
    ) -> MigrateResult<ValidationReport> {
        let scanned = scan_project(self.rules, root)?;
        let mut issues = Vec::new();

        match expected {
            Some(plan) => {
                for action in plan.actions() {
                    match action.kind {
                        ActionKind::Create | ActionKind::Overwrite | ActionKind::Merge => {
                            match scanned.get(&action.target) {
                                None => issues.push(ValidationIssue::MissingTarget {
                                    path: action.target.clone(),
                                    action: action.kind,
                                }),
                                Some(s) if s.artifact.kind != ArtifactKind::Current => {
                                    issues.push(ValidationIssue::NotCurrent {
                                        path: action.target.clone(),
                                        found: s.artifact.kind,
                                    })
                                }
                                Some(_) => {}
                            }
                        }
                        ActionKind::Delete => {
                            if scanned.contains_key(&action.target) {
                                issues.push(ValidationIssue::StillPresent {
                                    path: action.target.clone(),
                                });
                            }
                        }
                        ActionKind::Skip => {
                            // Only checkable when the plan recorded what
                            // the content looked like
                            if let Some(prior) = &action.prior_hash {
                                let stable = scanned
                                    .get(&action.target)
                                    .map(|s| s.artifact.content_hash == *prior)
                                    .unwrap_or(false);
                                if !stable {
                                    issues.push(ValidationIssue::SkippedChanged {
                                        path: action.target.clone(),
                                    });
                                }
                            }
                        }
                    }
                }
            }
            None => {
                for (path, s) in &scanned {
                    match s.artifact.kind {
                        ArtifactKind::Legacy => issues.push(ValidationIssue::LegacyRemains {
                            path: path.clone(),
                        }),
                        ArtifactKind::Unknown => self.reporter.warn(&format!(
                            "{}: unrecognized content, cannot be checked",
                            path.display()
                        )),
                        _ => {}
                    }
                }
            }
        }

        issues.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(ValidationReport {
            project_root: root.to_path_buf(),
            artifacts_scanned: scanned.len(),
            issues,
        })
    }
}
