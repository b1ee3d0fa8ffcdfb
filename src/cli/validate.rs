//! Validate CLI command
//!
//! Standalone check that a project tree is fully in the current scheme.
//! Exits non-zero when legacy artifacts remain.

use clap::Args;
use std::path::PathBuf;

use crate::cli::resolve_paths;
use crate::error::MigrateResult;
use crate::report::ConsoleReporter;
use crate::rules::ClaudeRules;
use crate::services::Validator;

#[derive(Args)]
pub struct ValidateArgs {
    /// Project root to check (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// List every issue found
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the validate command
pub fn handle_validate(args: ValidateArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), None)?;
    let rules = ClaudeRules::new();
    let reporter = ConsoleReporter::new(args.verbose);

    let report = Validator::new(&rules, &reporter).validate(paths.root(), None)?;

    if args.verbose {
        for issue in &report.issues {
            println!("  {}", issue);
        }
        if !report.issues.is_empty() {
            println!();
        }
    }

    if report.passed() {
        println!(
            "Validation passed: {} artifact(s) checked, none legacy.",
            report.artifacts_scanned
        );
    } else {
        println!(
            "Validation FAILED: {} issue(s) across {} artifact(s).",
            report.issues.len(),
            report.artifacts_scanned
        );
        if !args.verbose {
            println!("Run again with --verbose to list them.");
        }
    }

    Ok(report.passed())
}
