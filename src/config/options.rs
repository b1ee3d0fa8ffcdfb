//! Run options for the migration runner

use serde::{Deserialize, Serialize};

/// Flags controlling how a migration plan is executed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOptions {
    /// Compute and report everything, mutate nothing
    #[serde(default)]
    pub dry_run: bool,

    /// Skip the confirmation precondition on recently edited targets
    #[serde(default)]
    pub force: bool,

    /// Downgrade actions that target custom artifacts to skips
    #[serde(default)]
    pub preserve_custom: bool,

    /// Skip post-migration validation
    #[serde(default)]
    pub skip_validation: bool,
}

impl RunOptions {
    /// Options for a plain dry run
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }
}
