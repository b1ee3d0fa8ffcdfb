//! claude-migrate - Configuration tree migration engine
//!
//! This library migrates a project's configuration tree to the current
//! Claude scheme. It scans a bounded set of recognized locations,
//! classifies what it finds, computes a plan, executes that plan behind a
//! write-ahead backup, verifies the result, and can reverse any run from
//! its backup.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and runner options
//! - `error`: Custom error types
//! - `models`: Core data models (artifacts, plans, strategies, backups, results)
//! - `rules`: Pluggable classification rulesets; `ClaudeRules` ships here
//! - `storage`: Atomic file primitives
//! - `backup`: Content-addressed backup store
//! - `audit`: Append-only run history
//! - `services`: Analyzer, runner, validator, rollback manager
//! - `report`: Reporter and confirmation capabilities
//! - `display`: Terminal output formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use claude_migrate::config::ProjectPaths;
//! use claude_migrate::models::MigrationStrategy;
//! use claude_migrate::report::NullReporter;
//! use claude_migrate::rules::ClaudeRules;
//! use claude_migrate::services::Analyzer;
//!
//! let paths = ProjectPaths::new("/path/to/project");
//! let rules = ClaudeRules::new();
//! let reporter = NullReporter;
//! let analysis = Analyzer::new(&rules, &reporter)
//!     .analyze(paths.root(), MigrationStrategy::Selective)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod report;
pub mod rules;
pub mod services;
pub mod storage;

pub use error::{MigrateError, MigrateResult, RollbackError};
