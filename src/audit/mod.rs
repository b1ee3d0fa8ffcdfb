//! Run history for claude-migrate
//!
//! Records every real migration, rollback, and prune in an append-only log
//! inside the backup directory.
//!
//! # Architecture
//!
//! - `HistoryEntry`: one operation's summary (counts, backup id, strategy,
//!   validation verdict)
//! - `HistoryLog`: writes entries to `history.log` using a line-delimited
//!   JSON format (JSONL), one complete object per line
//!
//! Dry runs are not recorded; they change nothing worth replaying.

mod entry;
mod logger;

pub use entry::{HistoryEntry, OperationKind};
pub use logger::HistoryLog;
