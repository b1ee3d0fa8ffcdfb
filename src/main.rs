use anyhow::Result;
use clap::{Parser, Subcommand};

use claude_migrate::cli::{
    handle_analyze, handle_history, handle_list_backups, handle_migrate, handle_prune_backups,
    handle_rollback, handle_validate, AnalyzeArgs, HistoryArgs, ListBackupsArgs, MigrateArgs,
    PruneBackupsArgs, RollbackArgs, ValidateArgs,
};

#[derive(Parser)]
#[command(
    name = "claude-migrate",
    version,
    about = "Migrate project configuration trees to the current Claude scheme",
    long_about = "claude-migrate inspects a project's configuration tree, plans a \
                  migration to the current Claude scheme, applies it behind a \
                  write-ahead backup, verifies the result, and can roll any run \
                  back from its backup."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and show what a migration would do
    Analyze(AnalyzeArgs),

    /// Migrate a project to the current scheme
    Migrate(MigrateArgs),

    /// Restore a project from a backup
    Rollback(RollbackArgs),

    /// Check that a project is fully in the current scheme
    Validate(ValidateArgs),

    /// List available backups, newest first
    #[command(name = "list-backups")]
    ListBackups(ListBackupsArgs),

    /// Delete all but the newest backups
    #[command(name = "prune-backups")]
    PruneBackups(PruneBackupsArgs),

    /// Show recent migration and rollback history
    History(HistoryArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Analyze(args) => handle_analyze(args)?,
        Commands::Migrate(args) => handle_migrate(args)?,
        Commands::Rollback(args) => handle_rollback(args)?,
        Commands::Validate(args) => handle_validate(args)?,
        Commands::ListBackups(args) => handle_list_backups(args)?,
        Commands::PruneBackups(args) => handle_prune_backups(args)?,
        Commands::History(args) => handle_history(args)?,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
