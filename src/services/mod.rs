//! Engine services
//!
//! The analyzer reads and plans, the runner mutates, the validator
//! checks, and the rollback manager reverses. Each takes its
//! collaborators (ruleset, reporter, confirmation) by reference, so
//! none of them reach for globals.

pub mod analyzer;
pub mod rollback;
pub mod runner;
pub mod validator;

pub use analyzer::{Analyzer, ScannedArtifact};
pub use rollback::RollbackManager;
pub use runner::Runner;
pub use validator::{ValidationIssue, ValidationReport, Validator};
