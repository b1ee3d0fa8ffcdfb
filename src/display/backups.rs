//! Backup and history display formatting

use chrono::{Duration, Utc};

use crate::audit::HistoryEntry;
use crate::models::Backup;

/// Format the backup listing, newest first
pub fn format_backup_list(backups: &[Backup], verbose: bool) -> String {
    if backups.is_empty() {
        let mut output = String::new();
        output.push_str("No backups found.\n");
        output.push_str("One is created automatically by: claude-migrate migrate\n");
        return output;
    }

    let mut output = String::new();

    for (i, backup) in backups.iter().enumerate() {
        let age = format_duration(Utc::now().signed_duration_since(backup.created_at));

        if verbose {
            output.push_str(&format!(
                "{}. {}\n   Created: {}\n   Files:   {}\n   Size:    {}\n",
                i + 1,
                backup.id,
                backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                backup.entry_count,
                format_size(backup.total_bytes),
            ));
        } else {
            output.push_str(&format!(
                "  {}. {} ({} ago, {} file(s), {})\n",
                i + 1,
                backup.id,
                age,
                backup.entry_count,
                format_size(backup.total_bytes),
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!("Total: {} backup(s)\n", backups.len()));
    output
}

/// Format operation history entries, oldest first
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No operations recorded yet.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        let mut line = format!(
            "{}  {:<8}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.operation.to_string(),
        );

        if let Some(strategy) = entry.strategy {
            line.push_str(&format!(" strategy={}", strategy));
        }
        if let Some(backup) = &entry.backup {
            line.push_str(&format!(" backup={}", backup));
        }
        line.push_str(&format!(
            " applied={} skipped={} errors={}",
            entry.applied, entry.skipped, entry.errors
        ));
        if let Some(passed) = entry.validation_passed {
            line.push_str(if passed {
                " validation=passed"
            } else {
                " validation=failed"
            });
        }
        if let Some(detail) = &entry.detail {
            line.push_str(&format!(" ({})", detail));
        }

        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Format a duration in human-readable form
pub(crate) fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    if minutes < 1 {
        return "moments".to_string();
    }
    if minutes < 60 {
        return format!("{} minute(s)", minutes);
    }
    let hours = duration.num_hours();
    if hours < 24 {
        return format!("{} hour(s)", hours);
    }
    format!("{} day(s)", duration.num_days())
}

/// Format a file size in human-readable form
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
