//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine services.
//!
//! Each handler returns `Ok(true)` on success and `Ok(false)` when the
//! command completed but the outcome should exit non-zero (a failed
//! validation, a migration with recorded errors, a denied confirmation).

pub mod analyze;
pub mod backups;
pub mod migrate;
pub mod rollback;
pub mod validate;

pub use analyze::{handle_analyze, AnalyzeArgs};
pub use backups::{
    handle_history, handle_list_backups, handle_prune_backups, HistoryArgs, ListBackupsArgs,
    PruneBackupsArgs,
};
pub use migrate::{handle_migrate, MigrateArgs};
pub use rollback::{handle_rollback, RollbackArgs};
pub use validate::{handle_validate, ValidateArgs};

use std::path::PathBuf;

use crate::config::ProjectPaths;
use crate::error::{MigrateError, MigrateResult};

/// Resolve the project root and backup directory from command arguments
///
/// The root defaults to the current directory; a relative backup directory
/// is resolved against the root.
pub fn resolve_paths(
    path: Option<&PathBuf>,
    backup: Option<&PathBuf>,
) -> MigrateResult<ProjectPaths> {
    let root = match path {
        Some(p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| MigrateError::Config(format!("cannot determine current directory: {}", e)))?,
    };

    Ok(match backup {
        Some(dir) => ProjectPaths::with_backup_dir(root, dir.clone()),
        None => ProjectPaths::new(root),
    })
}
