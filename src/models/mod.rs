//! Core data models for claude-migrate
//!
//! This module contains the data structures the engine trades in: scanned
//! artifacts, plans and actions, strategies, analyses, backups, and run
//! results.

pub mod analysis;
pub mod artifact;
pub mod backup;
pub mod outcome;
pub mod plan;
pub mod strategy;

pub use analysis::{Analysis, ArtifactCounts, Risk, RiskKind};
pub use artifact::{ArtifactKind, ConfigArtifact, ContentHash};
pub use backup::{
    parse_backup_timestamp, Backup, BackupId, BackupManifest, ManifestEntry,
    MANIFEST_SCHEMA_VERSION,
};
pub use outcome::{ActionError, MigrationResult};
pub use plan::{ActionKind, MigrationAction, MigrationPlan, PlanCounts};
pub use strategy::MigrationStrategy;
