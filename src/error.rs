//! Custom error types for claude-migrate
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for migration operations
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Project scan failures (missing or unreadable root)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Two plan actions target the same path
    #[error("Plan conflict: {0}")]
    PlanConflict(String),

    /// Snapshot creation failures; raised before any mutation
    #[error("Backup error: {0}")]
    Backup(String),

    /// Post-migration verification could not run at all
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rollback failures
    #[error("Rollback error: {0}")]
    Rollback(#[from] RollbackError),

    /// The run needs explicit assent before overwriting recent edits
    #[error("confirmation required for {} path(s)", .paths.len())]
    ConfirmationRequired { paths: Vec<PathBuf> },

    /// Configuration-related errors (bad arguments, malformed timestamps)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Rollback failure modes
#[derive(Error, Debug)]
pub enum RollbackError {
    /// No backup at or before the requested timestamp
    #[error("no backup found: {0}")]
    NoBackupFound(String),

    /// The restore itself failed
    #[error("restore failed: {0}")]
    RestoreIo(String),
}

impl MigrateError {
    /// Create an analysis error with context
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Create a backup error with context
    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }

    /// Create a rollback error for a missing backup
    pub fn no_backup_found(msg: impl Into<String>) -> Self {
        Self::Rollback(RollbackError::NoBackupFound(msg.into()))
    }

    /// Create a rollback error for a failed restore
    pub fn restore_io(msg: impl Into<String>) -> Self {
        Self::Rollback(RollbackError::RestoreIo(msg.into()))
    }

    /// Check if this is a backup error
    pub fn is_backup(&self) -> bool {
        matches!(self, Self::Backup(_))
    }

    /// Check if this error asks the caller to confirm before proceeding
    pub fn is_confirmation_required(&self) -> bool {
        matches!(self, Self::ConfirmationRequired { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for MigrateError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for migration operations
pub type MigrateResult<T> = Result<T, MigrateError>;
