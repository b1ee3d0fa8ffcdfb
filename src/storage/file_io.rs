//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{MigrateError, MigrateResult};

/// Read a file's full content as bytes
pub fn read_bytes<P: AsRef<Path>>(path: P) -> MigrateResult<Vec<u8>> {
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| MigrateError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| MigrateError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(buf)
}

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> MigrateResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(MigrateError::Io(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| MigrateError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| MigrateError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified
/// at all, preventing corruption on crashes or power failures.
pub fn write_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> MigrateResult<()> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MigrateError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory (important for atomic rename)
    let temp_path = temp_sibling(path);

    let file = File::create(&temp_path)
        .map_err(|e| MigrateError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(data)
        .map_err(|e| MigrateError::Io(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| MigrateError::Io(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| MigrateError::Io(format!("Failed to sync data: {}", e)))?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| {
        // Try to clean up temp file if rename fails
        let _ = fs::remove_file(&temp_path);
        MigrateError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Write a value as pretty JSON, atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> MigrateResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| MigrateError::Json(format!("Failed to serialize data: {}", e)))?;
    write_atomic(path, json.as_bytes())
}

/// Remove a file if it exists; returns whether anything was removed
pub fn remove_file_if_exists<P: AsRef<Path>>(path: P) -> MigrateResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)
        .map_err(|e| MigrateError::Io(format!("Failed to remove {}: {}", path.display(), e)))?;
    Ok(true)
}

/// Last-modified time of a file
pub fn modified_time<P: AsRef<Path>>(path: P) -> MigrateResult<DateTime<Utc>> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .map_err(|e| MigrateError::Io(format!("Failed to stat {}: {}", path.display(), e)))?;
    let modified = metadata
        .modified()
        .map_err(|e| MigrateError::Io(format!("Failed to read mtime of {}: {}", path.display(), e)))?;
    Ok(modified.into())
}

/// Sibling temp path: the original file name with ".tmp" appended
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| std::ffi::OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}
