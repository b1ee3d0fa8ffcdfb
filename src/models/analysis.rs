//! Analysis model
//!
//! The result of one read-only project scan: the classified artifacts, the
//! plan the strategy produced, a readiness score, and the risks worth
//! surfacing before anyone runs the plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::artifact::{ArtifactKind, ConfigArtifact};
use super::plan::MigrationPlan;

/// Category of migration risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Artifact content could not be classified; it will be skipped
    UnknownFormat,
    /// The plan replaces a user-authored artifact
    ReplacesCustom,
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat => write!(f, "unknown format"),
            Self::ReplacesCustom => write!(f, "replaces custom"),
        }
    }
}

/// One surfaced risk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    pub kind: RiskKind,
    pub path: PathBuf,
    pub detail: String,
}

impl Risk {
    pub fn new(kind: RiskKind, path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.path.display(), self.detail)
    }
}

/// Artifact totals by classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCounts {
    pub legacy: usize,
    pub current: usize,
    pub custom: usize,
    pub unknown: usize,
}

impl ArtifactCounts {
    pub fn total(&self) -> usize {
        self.legacy + self.current + self.custom + self.unknown
    }
}

/// Everything the analyzer learned in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Project root that was scanned
    pub project_root: PathBuf,

    /// When the scan ran
    pub scanned_at: DateTime<Utc>,

    /// Every artifact found, sorted by path
    pub artifacts: Vec<ConfigArtifact>,

    /// The plan the strategy produced from this scan
    pub plan: MigrationPlan,

    /// Fraction of artifacts already in the current scheme (1.0 when empty)
    pub readiness_score: f64,

    /// Risks worth reading before running the plan
    pub risks: Vec<Risk>,
}

impl Analysis {
    /// Assemble an analysis, deriving the readiness score from the artifacts
    pub fn new(
        project_root: impl Into<PathBuf>,
        artifacts: Vec<ConfigArtifact>,
        plan: MigrationPlan,
        risks: Vec<Risk>,
    ) -> Self {
        let readiness_score = readiness(&artifacts);
        Self {
            project_root: project_root.into(),
            scanned_at: Utc::now(),
            artifacts,
            plan,
            readiness_score,
            risks,
        }
    }

    /// Artifact totals by classification
    pub fn counts(&self) -> ArtifactCounts {
        let mut counts = ArtifactCounts::default();
        for artifact in &self.artifacts {
            match artifact.kind {
                ArtifactKind::Legacy => counts.legacy += 1,
                ArtifactKind::Current => counts.current += 1,
                ArtifactKind::Custom => counts.custom += 1,
                ArtifactKind::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// Whether nothing needs migrating
    pub fn is_fully_current(&self) -> bool {
        self.plan.is_noop()
    }
}

/// Fraction of artifacts already current; an empty scan counts as ready
fn readiness(artifacts: &[ConfigArtifact]) -> f64 {
    if artifacts.is_empty() {
        return 1.0;
    }
    let current = artifacts
        .iter()
        .filter(|a| a.kind == ArtifactKind::Current)
        .count();
    current as f64 / artifacts.len() as f64
}
