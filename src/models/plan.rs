//! Migration plan model
//!
//! A plan is pure data: an ordered list of actions plus the strategy that
//! produced it. Computing a plan performs no I/O beyond the read-only scan
//! that fed it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, MigrateResult};

use super::artifact::{ArtifactKind, ContentHash};
use super::strategy::MigrationStrategy;

/// Kind of change a single action performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Write a file that does not exist yet (or materialize a converted one)
    Create,
    /// Replace an existing file's content
    Overwrite,
    /// Remove a file
    Delete,
    /// Write combined legacy-plus-existing content
    Merge,
    /// Leave the path untouched
    Skip,
}

impl ActionKind {
    /// Whether this action changes the filesystem
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Delete => write!(f, "delete"),
            Self::Merge => write!(f, "merge"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// One planned change to one path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationAction {
    /// What to do
    pub kind: ActionKind,

    /// Target path, relative to the project root
    pub target: PathBuf,

    /// New file content for create/overwrite/merge actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Why the plan chose this action, derived from classification
    pub reason: String,

    /// Classification of the artifact already at the target, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_kind: Option<ArtifactKind>,

    /// Content hash of the artifact already at the target, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_hash: Option<ContentHash>,
}

impl MigrationAction {
    /// Create-a-file action
    pub fn create(
        target: impl Into<PathBuf>,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Create,
            target: target.into(),
            content: Some(content.into()),
            reason: reason.into(),
            prior_kind: None,
            prior_hash: None,
        }
    }

    /// Replace-a-file action
    pub fn overwrite(
        target: impl Into<PathBuf>,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Overwrite,
            target: target.into(),
            content: Some(content.into()),
            reason: reason.into(),
            prior_kind: None,
            prior_hash: None,
        }
    }

    /// Remove-a-file action
    pub fn delete(target: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Delete,
            target: target.into(),
            content: None,
            reason: reason.into(),
            prior_kind: None,
            prior_hash: None,
        }
    }

    /// Write-merged-content action
    pub fn merge(
        target: impl Into<PathBuf>,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Merge,
            target: target.into(),
            content: Some(content.into()),
            reason: reason.into(),
            prior_kind: None,
            prior_hash: None,
        }
    }

    /// Leave-alone action
    pub fn skip(target: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Skip,
            target: target.into(),
            content: None,
            reason: reason.into(),
            prior_kind: None,
            prior_hash: None,
        }
    }

    /// Record what already sits at the target path
    pub fn with_prior(mut self, kind: ArtifactKind, hash: ContentHash) -> Self {
        self.prior_kind = Some(kind);
        self.prior_hash = Some(hash);
        self
    }

    /// Whether this action changes the filesystem
    pub fn is_mutating(&self) -> bool {
        self.kind.is_mutating()
    }

    /// Whether the target currently holds a custom-classified artifact
    pub fn targets_custom(&self) -> bool {
        self.prior_kind == Some(ArtifactKind::Custom)
    }
}

impl fmt::Display for MigrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.target.display())
    }
}

/// Per-kind action counts for summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCounts {
    pub create: usize,
    pub overwrite: usize,
    pub delete: usize,
    pub merge: usize,
    pub skip: usize,
}

impl PlanCounts {
    /// Total actions counted
    pub fn total(&self) -> usize {
        self.create + self.overwrite + self.delete + self.merge + self.skip
    }

    /// Actions that would change the filesystem
    pub fn mutating(&self) -> usize {
        self.total() - self.skip
    }
}

/// An ordered, conflict-free sequence of migration actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPlan {
    strategy: MigrationStrategy,
    actions: Vec<MigrationAction>,
}

impl MigrationPlan {
    /// Build a plan, rejecting duplicate targets and fixing the order
    ///
    /// Ordering puts deletions first, then writes, then skips, each group
    /// sorted by path so plans are deterministic.
    pub fn new(
        strategy: MigrationStrategy,
        actions: Vec<MigrationAction>,
    ) -> MigrateResult<Self> {
        let mut seen: BTreeSet<&Path> = BTreeSet::new();
        for action in &actions {
            if !seen.insert(action.target.as_path()) {
                return Err(MigrateError::PlanConflict(format!(
                    "two actions target the same path: {}",
                    action.target.display()
                )));
            }
        }

        let mut actions = actions;
        actions.sort_by(|a, b| {
            order_rank(a.kind)
                .cmp(&order_rank(b.kind))
                .then_with(|| a.target.cmp(&b.target))
        });

        Ok(Self { strategy, actions })
    }

    /// An empty plan
    pub fn empty(strategy: MigrationStrategy) -> Self {
        Self {
            strategy,
            actions: Vec::new(),
        }
    }

    /// The strategy that produced this plan
    pub fn strategy(&self) -> MigrationStrategy {
        self.strategy
    }

    /// All actions in execution order
    pub fn actions(&self) -> &[MigrationAction] {
        &self.actions
    }

    /// Actions that would change the filesystem
    pub fn mutating_actions(&self) -> impl Iterator<Item = &MigrationAction> {
        self.actions.iter().filter(|a| a.is_mutating())
    }

    /// Whether the plan changes nothing
    pub fn is_noop(&self) -> bool {
        self.mutating_actions().next().is_none()
    }

    /// Per-kind action counts
    pub fn counts(&self) -> PlanCounts {
        let mut counts = PlanCounts::default();
        for action in &self.actions {
            match action.kind {
                ActionKind::Create => counts.create += 1,
                ActionKind::Overwrite => counts.overwrite += 1,
                ActionKind::Delete => counts.delete += 1,
                ActionKind::Merge => counts.merge += 1,
                ActionKind::Skip => counts.skip += 1,
            }
        }
        counts
    }
}

/// Execution-order rank: deletions clear the way before any write lands
fn order_rank(kind: ActionKind) -> u8 {
    match kind {
        ActionKind::Delete => 0,
        ActionKind::Create | ActionKind::Overwrite | ActionKind::Merge => 1,
        ActionKind::Skip => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_targets_rejected() {
        let actions = vec![
            MigrationAction::create("a.json", "{}", "x"),
            MigrationAction::delete("a.json", "y"),
        ];
        let err = MigrationPlan::new(MigrationStrategy::Selective, actions).unwrap_err();
        assert!(matches!(err, MigrateError::PlanConflict(_)));
        assert!(err.to_string().contains("a.json"));
    }

    #[test]
    fn test_ordering_deletes_before_writes() {
        let actions = vec![
            MigrationAction::skip("z.json", "already current"),
            MigrationAction::create(".claude/settings.json", "{}", "converted"),
            MigrationAction::delete(".claude.json", "superseded"),
        ];
        let plan = MigrationPlan::new(MigrationStrategy::Selective, actions).unwrap();

        let kinds: Vec<ActionKind> = plan.actions().iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Delete, ActionKind::Create, ActionKind::Skip]
        );
    }

    #[test]
    fn test_counts() {
        let actions = vec![
            MigrationAction::create("a", "1", ""),
            MigrationAction::overwrite("b", "2", ""),
            MigrationAction::skip("c", ""),
            MigrationAction::skip("d", ""),
        ];
        let plan = MigrationPlan::new(MigrationStrategy::Full, actions).unwrap();
        let counts = plan.counts();
        assert_eq!(counts.create, 1);
        assert_eq!(counts.overwrite, 1);
        assert_eq!(counts.skip, 2);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.mutating(), 2);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_noop_plan() {
        let actions = vec![MigrationAction::skip("a", "current")];
        let plan = MigrationPlan::new(MigrationStrategy::Selective, actions).unwrap();
        assert!(plan.is_noop());
        assert!(MigrationPlan::empty(MigrationStrategy::Selective).is_noop());
    }

    #[test]
    fn test_with_prior() {
        let action = MigrationAction::overwrite("b.cfg", "{}", "stock replacement")
            .with_prior(ArtifactKind::Custom, ContentHash::compute(b"old"));
        assert!(action.targets_custom());
        assert!(action.is_mutating());
    }

    #[test]
    fn test_serialization_round_trip() {
        let actions = vec![
            MigrationAction::create("a", "content", "reason"),
            MigrationAction::skip("b", "current"),
        ];
        let plan = MigrationPlan::new(MigrationStrategy::Merge, actions).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let back: MigrationPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategy(), MigrationStrategy::Merge);
        assert_eq!(back.actions().len(), 2);
    }
}
