//! Analyze CLI command
//!
//! Scans a project, shows what a migration would do, and optionally
//! saves the analysis to a file.

use clap::Args;
use std::path::PathBuf;

use crate::cli::resolve_paths;
use crate::display::{
    format_analysis_summary, format_artifact_list, format_plan, format_risk_list,
};
use crate::error::MigrateResult;
use crate::models::MigrationStrategy;
use crate::report::NullReporter;
use crate::rules::ClaudeRules;
use crate::services::Analyzer;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Project root to analyze (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Strategy to plan with
    #[arg(short, long, value_enum, default_value_t = MigrationStrategy::Selective)]
    pub strategy: MigrationStrategy,

    /// Also list every discovered artifact
    #[arg(short, long)]
    pub detailed: bool,

    /// Write the analysis to a file (.json, .yaml, or .yml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the analyze command
pub fn handle_analyze(args: AnalyzeArgs) -> MigrateResult<bool> {
    let paths = resolve_paths(args.path.as_ref(), None)?;
    let rules = ClaudeRules::new();
    let reporter = NullReporter;
    let analyzer = Analyzer::new(&rules, &reporter);

    let analysis = analyzer.analyze(paths.root(), args.strategy)?;

    println!("Migration Analysis");
    println!("==================");
    print!("{}", format_analysis_summary(&analysis));
    println!();

    if args.detailed {
        print!("{}", format_artifact_list(&analysis.artifacts));
        println!();
    }

    if !analysis.plan.is_noop() {
        print!("{}", format_plan(&analysis.plan));
    }

    let risks = format_risk_list(&analysis.risks);
    if !risks.is_empty() {
        println!();
        print!("{}", risks);
    }

    if let Some(dest) = &args.output {
        analyzer.save_analysis(&analysis, dest)?;
        println!();
        println!("Analysis saved to {}", dest.display());
    }

    Ok(true)
}
