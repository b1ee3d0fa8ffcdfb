//! Backup housekeeping CLI commands
//!
//! list-backups, prune-backups, and history all read (and, for prune,
//! write) the backup directory without touching the project tree.

use clap::Args;
use std::path::PathBuf;

use crate::audit::{HistoryEntry, HistoryLog};
use crate::backup::BackupStore;
use crate::cli::resolve_paths;
use crate::config::DEFAULT_BACKUP_DIR;
use crate::display::{format_backup_list, format_history};
use crate::error::MigrateResult;

#[derive(Args)]
pub struct ListBackupsArgs {
    /// Project root (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Backup directory (relative paths resolve against the project root)
    #[arg(short, long, default_value = DEFAULT_BACKUP_DIR, env = "CLAUDE_MIGRATE_BACKUP_DIR")]
    pub backup: PathBuf,

    /// Show detailed information per backup
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the list-backups command
pub fn handle_list_backups(args: ListBackupsArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), Some(&args.backup))?;
    let store = BackupStore::open(paths.backup_dir());
    let backups = store.list()?;

    println!("Available Backups");
    println!("=================");
    println!();
    print!("{}", format_backup_list(&backups, args.verbose));

    Ok(true)
}

#[derive(Args)]
pub struct PruneBackupsArgs {
    /// Project root (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Backup directory (relative paths resolve against the project root)
    #[arg(short, long, default_value = DEFAULT_BACKUP_DIR, env = "CLAUDE_MIGRATE_BACKUP_DIR")]
    pub backup: PathBuf,

    /// How many of the newest backups to keep
    #[arg(short, long, default_value_t = 5)]
    pub keep: usize,

    /// Actually delete; without this the command only previews
    #[arg(short, long)]
    pub force: bool,
}

/// Handle the prune-backups command
pub fn handle_prune_backups(args: PruneBackupsArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), Some(&args.backup))?;
    let store = BackupStore::open(paths.backup_dir());

    let backups = store.list()?;
    let to_delete = backups.len().saturating_sub(args.keep);

    if to_delete == 0 {
        println!(
            "Nothing to prune: {} backup(s), keeping {}.",
            backups.len(),
            args.keep
        );
        return Ok(true);
    }

    println!("Prune Summary");
    println!("=============");
    println!("Backups:       {}", backups.len());
    println!("Keeping:       {} (newest)", args.keep);
    println!("To be deleted: {}", to_delete);
    for backup in backups.iter().skip(args.keep) {
        println!("  {}", backup.id);
    }
    println!();

    if !args.force {
        println!("To delete these backups, run again with --force:");
        println!("  claude-migrate prune-backups --keep {} --force", args.keep);
        return Ok(true);
    }

    let summary = store.prune(args.keep)?;
    println!(
        "Deleted {} backup(s) and {} orphaned blob(s).",
        summary.removed.len(),
        summary.blobs_removed
    );

    let history = HistoryLog::new(paths.history_log());
    if let Err(e) = history.log(&HistoryEntry::prune(&summary)) {
        eprintln!("Warning: could not record prune in history: {}", e);
    }

    Ok(true)
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Project root (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Backup directory (relative paths resolve against the project root)
    #[arg(short, long, default_value = DEFAULT_BACKUP_DIR, env = "CLAUDE_MIGRATE_BACKUP_DIR")]
    pub backup: PathBuf,

    /// How many recent entries to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

/// Handle the history command
pub fn handle_history(args: HistoryArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), Some(&args.backup))?;
    let history = HistoryLog::new(paths.history_log());
    let entries = history.read_recent(args.limit)?;

    println!("Run History");
    println!("===========");
    println!();
    print!("{}", format_history(&entries));

    Ok(true)
}
