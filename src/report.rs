//! Reporting and confirmation capabilities
//!
//! The engine never prints or prompts on its own. Callers hand it a
//! `Reporter` for progress output and a `Confirm` for the overwrite
//! precondition, so the same engine runs interactively, in scripts, and in
//! tests without a global logger anywhere.

use std::path::PathBuf;

/// Progress and warning sink handed to every engine component
pub trait Reporter {
    /// Headline progress, always worth showing
    fn info(&self, message: &str);

    /// Per-item detail, shown only in verbose contexts
    fn detail(&self, message: &str);

    /// Something worth attention that doesn't stop the run
    fn warn(&self, message: &str);
}

/// Assent capability for actions that would clobber recent edits
pub trait Confirm {
    /// Whether to proceed with the mutations affecting `paths`
    fn confirm(&self, prompt: &str, paths: &[PathBuf]) -> bool;
}

/// Reporter that prints to stdout/stderr
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn detail(&self, message: &str) {
        if self.verbose {
            println!("  {}", message);
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}

/// Reporter that swallows everything
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str) {}
    fn detail(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

/// Confirmation that always declines; the non-interactive default
pub struct DenyAll;

impl Confirm for DenyAll {
    fn confirm(&self, _prompt: &str, _paths: &[PathBuf]) -> bool {
        false
    }
}

/// Confirmation that always assents
pub struct AllowAll;

impl Confirm for AllowAll {
    fn confirm(&self, _prompt: &str, _paths: &[PathBuf]) -> bool {
        true
    }
}
