//! Rollback CLI command
//!
//! Restores the project from a backup: the newest one, or the newest one
//! at-or-before --timestamp. Without --force the command only shows what
//! would be restored.

use clap::Args;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::backup::BackupStore;
use crate::cli::resolve_paths;
use crate::config::DEFAULT_BACKUP_DIR;
use crate::display::backups::format_size;
use crate::error::{MigrateError, MigrateResult};
use crate::models::parse_backup_timestamp;
use crate::report::ConsoleReporter;
use crate::services::RollbackManager;

#[derive(Args)]
pub struct RollbackArgs {
    /// Project root to restore (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Backup directory (relative paths resolve against the project root)
    #[arg(short, long, default_value = DEFAULT_BACKUP_DIR, env = "CLAUDE_MIGRATE_BACKUP_DIR")]
    pub backup: PathBuf,

    /// Restore the newest backup at or before this timestamp
    /// (YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm)
    #[arg(short, long)]
    pub timestamp: Option<String>,

    /// Actually restore; without this the command only previews
    #[arg(short, long)]
    pub force: bool,

    /// Show per-file detail
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the rollback command
pub fn handle_rollback(args: RollbackArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), Some(&args.backup))?;
    let at_or_before = parse_timestamp_arg(args.timestamp.as_deref())?;

    if !args.force {
        preview(&paths, at_or_before, args.verbose)?;
        return Ok(true);
    }

    let reporter = ConsoleReporter::new(args.verbose);
    RollbackManager::new(&reporter).rollback(&paths, at_or_before)?;
    println!("Rollback complete.");

    Ok(true)
}

/// Show what a forced rollback would restore
fn preview(
    paths: &crate::config::ProjectPaths,
    at_or_before: Option<DateTime<Utc>>,
    verbose: bool,
) -> MigrateResult<()> {
    let store = BackupStore::open(paths.backup_dir());
    let backup = store.find(at_or_before)?.ok_or_else(|| match at_or_before {
        Some(t) => MigrateError::no_backup_found(format!(
            "no backup at or before {}",
            t.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => MigrateError::no_backup_found("no backups exist yet"),
    })?;

    let manifest = store.load_manifest(&backup.id)?;

    println!("Rollback Preview");
    println!("================");
    println!("Backup:  {}", backup.id);
    println!(
        "Created: {}",
        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Scope:   {} file(s), {}",
        backup.entry_count,
        format_size(backup.total_bytes)
    );

    if verbose {
        println!();
        for entry in &manifest.entries {
            match &entry.blob {
                Some(_) => println!("  restore {}", entry.path.display()),
                None => println!("  remove  {}", entry.path.display()),
            }
        }
    }

    println!();
    println!("WARNING: This will overwrite the files above with backed-up content!");
    println!("To proceed, run again with --force:");
    println!("  claude-migrate rollback --force");

    Ok(())
}

/// Parse the --timestamp argument
fn parse_timestamp_arg(arg: Option<&str>) -> MigrateResult<Option<DateTime<Utc>>> {
    match arg {
        None => Ok(None),
        Some(s) => parse_backup_timestamp(s).map(Some).ok_or_else(|| {
            MigrateError::Config(format!(
                "invalid timestamp '{}'; expected YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm",
                s
            ))
        }),
    }
}
