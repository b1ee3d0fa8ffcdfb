//! Classification rulesets
//!
//! The engine never hardcodes what a configuration scheme looks like. A
//! `Ruleset` tells it which locations to scan, how to classify what it
//! finds, and how legacy content converts, merges, or gets replaced. The
//! binary ships one ruleset for the Claude project-configuration scheme;
//! embedders can supply their own.

pub mod claude;

pub use claude::ClaudeRules;

use std::path::{Path, PathBuf};

use crate::models::ArtifactKind;

/// One place the analyzer is allowed to look, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanLocation {
    /// A single file to probe
    File(PathBuf),
    /// A directory whose direct children are probed
    Dir(PathBuf),
}

/// A pluggable description of a configuration scheme
///
/// All paths are relative to the project root. Implementations must be
/// pure: same inputs, same answers, no I/O.
pub trait Ruleset {
    /// Short name for reports and history entries
    fn name(&self) -> &str;

    /// The bounded set of locations a scan may inspect
    fn locations(&self) -> Vec<ScanLocation>;

    /// Classify one discovered file by path and content
    ///
    /// Ambiguity is not an error; anything unrecognizable is `Unknown`.
    fn classify(&self, path: &Path, content: &[u8]) -> ArtifactKind;

    /// Where a legacy artifact's conversion lands; None means in place
    fn target_for(&self, _path: &Path) -> Option<PathBuf> {
        None
    }

    /// Render current-scheme content for a legacy artifact
    ///
    /// None means the ruleset has no conversion for this content, so the
    /// plan skips it.
    fn render_current(&self, path: &Path, content: &[u8]) -> Option<String>;

    /// Stock content written when `full` strategy replaces a custom artifact
    ///
    /// None means there is nothing sensible to write, so even `full` skips.
    fn stock_content(&self, _path: &Path) -> Option<String> {
        None
    }

    /// Declared merge rule for a slot: combine legacy content with what
    /// already occupies the destination
    ///
    /// None means no rule is declared and `merge` strategy falls back to
    /// selective behavior.
    fn merge(&self, _path: &Path, _legacy: &[u8], _existing: &[u8]) -> Option<String> {
        None
    }

    /// The slot's user-custom counterpart location, if the scheme has one
    fn custom_counterpart(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}
