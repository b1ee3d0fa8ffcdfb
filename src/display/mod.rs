//! Terminal output formatting
//!
//! Formats engine data for terminal display. Pure string builders; the
//! CLI layer decides what actually gets printed.

pub mod analysis;
pub mod backups;
pub mod outcome;

pub use analysis::{format_analysis_summary, format_artifact_list, format_plan, format_risk_list};
pub use backups::{format_backup_list, format_history};
pub use outcome::format_result;
