//! Configuration module for claude-migrate
//!
//! This module provides run configuration:
//! - Project and backup path resolution
//! - Runner option flags

pub mod options;
pub mod paths;

pub use options::RunOptions;
pub use paths::{ProjectPaths, DEFAULT_BACKUP_DIR};
