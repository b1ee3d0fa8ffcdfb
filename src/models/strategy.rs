//! Migration strategy model
//!
//! A strategy is a pure mapping from an artifact's classification (plus
//! whether a user-custom counterpart exists for its slot) to the kind of
//! action the plan takes. Unknown artifacts map to skips under every
//! strategy.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::artifact::ArtifactKind;
use super::plan::ActionKind;

/// How aggressively a migration converts artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStrategy {
    /// Migrate everything it can, replacing custom artifacts with stock content
    Full,
    /// Migrate only artifacts without a custom counterpart
    Selective,
    /// Combine legacy and existing content where both exist, else selective
    Merge,
}

impl MigrationStrategy {
    /// Parse strategy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "selective" => Some(Self::Selective),
            "merge" => Some(Self::Merge),
            _ => None,
        }
    }

    /// Resolve the action kind for one artifact
    ///
    /// `has_custom_counterpart` is true when the artifact's slot also holds
    /// a custom-classified artifact (or its target is occupied by one).
    pub fn resolve(&self, kind: ArtifactKind, has_custom_counterpart: bool) -> ActionKind {
        match kind {
            ArtifactKind::Unknown => ActionKind::Skip,
            ArtifactKind::Current => ActionKind::Skip,
            ArtifactKind::Legacy => match self {
                Self::Full => ActionKind::Create,
                Self::Selective => {
                    if has_custom_counterpart {
                        ActionKind::Skip
                    } else {
                        ActionKind::Create
                    }
                }
                Self::Merge => {
                    if has_custom_counterpart {
                        ActionKind::Merge
                    } else {
                        ActionKind::Create
                    }
                }
            },
            ArtifactKind::Custom => match self {
                Self::Full => ActionKind::Overwrite,
                Self::Selective | Self::Merge => ActionKind::Skip,
            },
        }
    }
}

impl Default for MigrationStrategy {
    fn default() -> Self {
        Self::Selective
    }
}

impl fmt::Display for MigrationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Selective => write!(f, "selective"),
            Self::Merge => write!(f, "merge"),
        }
    }
}
