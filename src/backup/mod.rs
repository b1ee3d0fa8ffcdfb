//! Backup system for claude-migrate
//!
//! Write-ahead snapshots with content-addressed storage.
//!
//! # Architecture
//!
//! The backup system consists of two main components:
//!
//! - `BlobStore`: A content-addressed pool where every captured file body
//!   is stored once, keyed by its SHA-256
//! - `BackupStore`: One timestamp-named directory per backup holding a
//!   `manifest.json` that maps original paths to blobs
//!
//! # Layout
//!
//! ```text
//! <backup-dir>/
//!   history.log                  run history, one JSON entry per line
//!   objects/ab/cdef...           shared blob pool, sharded by hash prefix
//!   20250610-081500-042/
//!     manifest.json              schema version, root path, entries
//! ```
//!
//! A manifest entry with no blob records that the path did not exist at
//! snapshot time; restoring such an entry removes the file. That is what
//! makes a migrate-then-rollback sequence an exact round trip even when
//! the migration created new files.
//!
//! Backups are immutable and never deleted except by explicit pruning.

mod blobs;
mod store;

pub use blobs::BlobStore;
pub use store::{BackupStore, PruneSummary, RestoreSummary};
