//! Migrate CLI command
//!
//! Analyzes the project, then executes the resulting plan. The command is
//! non-interactive: when a target has uncaptured edits the run stops with
//! guidance to re-run with --force rather than prompting.

use clap::Args;
use std::path::PathBuf;

use crate::cli::resolve_paths;
use crate::config::{RunOptions, DEFAULT_BACKUP_DIR};
use crate::display::format_result;
use crate::error::{MigrateError, MigrateResult};
use crate::models::MigrationStrategy;
use crate::report::{ConsoleReporter, DenyAll};
use crate::rules::ClaudeRules;
use crate::services::{Analyzer, Runner};

#[derive(Args)]
pub struct MigrateArgs {
    /// Project root to migrate (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Migration strategy
    #[arg(short, long, value_enum, default_value_t = MigrationStrategy::Selective)]
    pub strategy: MigrationStrategy,

    /// Backup directory (relative paths resolve against the project root)
    #[arg(short, long, default_value = DEFAULT_BACKUP_DIR, env = "CLAUDE_MIGRATE_BACKUP_DIR")]
    pub backup: PathBuf,

    /// Proceed even when targets changed since their last backup
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be done without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Never touch user-authored artifacts, regardless of strategy
    #[arg(short, long)]
    pub preserve_custom: bool,

    /// Skip the post-migration validation pass
    #[arg(long)]
    pub skip_validation: bool,

    /// Show per-action detail while running
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the migrate command
pub fn handle_migrate(args: MigrateArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), Some(&args.backup))?;
    let rules = ClaudeRules::new();
    let reporter = ConsoleReporter::new(args.verbose);

    let analysis = Analyzer::new(&rules, &reporter).analyze(paths.root(), args.strategy)?;

    if analysis.plan.is_noop() {
        println!("Nothing to migrate; the project is already in the current scheme.");
        return Ok(true);
    }

    let options = RunOptions {
        dry_run: args.dry_run,
        force: args.force,
        preserve_custom: args.preserve_custom,
        skip_validation: args.skip_validation,
    };

    let runner = Runner::new(&paths, &rules, &reporter, &DenyAll);
    let result = match runner.run(&analysis.plan, &options) {
        Ok(result) => result,
        Err(MigrateError::ConfirmationRequired { paths }) => {
            eprintln!("These files changed since their last backup:");
            for path in &paths {
                eprintln!("  {}", path.display());
            }
            eprintln!();
            eprintln!("To replace them anyway, run again with --force:");
            eprintln!("  claude-migrate migrate --force");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    println!();
    print!("{}", format_result(&result));

    Ok(result.succeeded())
}
