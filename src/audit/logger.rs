//! History logger for the append-only run history
//!
//! Provides the HistoryLog struct that writes history entries to a log file.
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{MigrateError, MigrateResult};

use super::entry::HistoryEntry;

/// Handles writing run history entries to the history log file
///
/// The log file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one history entry.
pub struct HistoryLog {
    /// Path to the history log file
    log_path: PathBuf,
}

impl HistoryLog {
    /// Create a new HistoryLog that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Log a history entry
    ///
    /// Appends the entry as a JSON line to the history log file.
    /// Each write is flushed immediately to ensure durability.
    pub fn log(&self, entry: &HistoryEntry) -> MigrateResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| MigrateError::Io(format!("Failed to open history log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| MigrateError::Json(format!("Failed to serialize history entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| MigrateError::Io(format!("Failed to write history entry: {}", e)))?;

        file.flush()
            .map_err(|e| MigrateError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Read all history entries from the log file
    ///
    /// Returns entries in chronological order (oldest first).
    pub fn read_all(&self) -> MigrateResult<Vec<HistoryEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| MigrateError::Io(format!("Failed to open history log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                MigrateError::Io(format!(
                    "Failed to read history log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let entry: HistoryEntry = serde_json::from_str(&line).map_err(|e| {
                MigrateError::Json(format!(
                    "Failed to parse history entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries from the log
    pub fn read_recent(&self, count: usize) -> MigrateResult<Vec<HistoryEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Get the number of entries in the history log
    pub fn entry_count(&self) -> MigrateResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| MigrateError::Io(format!("Failed to open history log: {}", e)))?;

        let reader = BufReader::new(file);
        let count = reader.lines().filter(|l| l.is_ok()).count();

        Ok(count)
    }

    /// Check if the history log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the history log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::OperationKind;
    use crate::backup::RestoreSummary;
    use crate::models::BackupId;
    use tempfile::TempDir;

    fn create_test_log() -> (HistoryLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("history.log");
        let log = HistoryLog::new(log_path);
        (log, temp_dir)
    }

    fn create_test_entry(written: usize) -> HistoryEntry {
        let backup = BackupId::parse("20250101-000000-000").unwrap();
        HistoryEntry::rollback(
            &backup,
            &RestoreSummary {
                written,
                removed: 0,
            },
        )
    }

    #[test]
    fn test_log_and_read() {
        let (log, _temp) = create_test_log();

        log.log(&create_test_entry(2)).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, OperationKind::Rollback);
        assert_eq!(entries[0].applied, 2);
    }

    #[test]
    fn test_multiple_entries_in_order() {
        let (log, _temp) = create_test_log();

        for i in 0..5 {
            log.log(&create_test_entry(i)).unwrap();
        }

        assert_eq!(log.entry_count().unwrap(), 5);

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].applied, 0);
        assert_eq!(entries[4].applied, 4);
    }

    #[test]
    fn test_read_recent() {
        let (log, _temp) = create_test_log();

        for i in 0..10 {
            log.log(&create_test_entry(i)).unwrap();
        }

        let recent = log.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].applied, 7);
        assert_eq!(recent[2].applied, 9);
    }

    #[test]
    fn test_empty_log() {
        let (log, _temp) = create_test_log();

        assert!(!log.exists());
        assert_eq!(log.entry_count().unwrap(), 0);
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_survives_restart() {
        let (log, temp) = create_test_log();

        log.log(&create_test_entry(1)).unwrap();

        // A new log pointing to the same file still reads it
        let log2 = HistoryLog::new(temp.path().join("history.log"));
        let entries = log2.read_all().unwrap();
        assert_eq!(entries.len(), 1);
    }
}
