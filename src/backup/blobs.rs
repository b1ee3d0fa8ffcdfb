//! Content-addressed blob pool
//!
//! Every backed-up file body is stored once, keyed by its SHA-256, under
//! `objects/<first two hex chars>/<rest>`. Backups that capture identical
//! content share a single blob; a blob disappears only when pruning finds
//! no manifest referencing it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, MigrateResult};
use crate::models::ContentHash;
use crate::storage::file_io;

/// Blob pool rooted at an `objects/` directory
#[derive(Debug, Clone)]
pub struct BlobStore {
    objects_dir: PathBuf,
}

impl BlobStore {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
        }
    }

    /// Store content, returning its address; storing existing content is free
    pub fn put(&self, data: &[u8]) -> MigrateResult<ContentHash> {
        let hash = ContentHash::compute(data);
        let path = self.blob_path(&hash);

        if path.exists() {
            return Ok(hash);
        }

        file_io::write_atomic(&path, data)
            .map_err(|e| MigrateError::backup(format!("Failed to store blob {}: {}", hash.short(), e)))?;

        Ok(hash)
    }

    /// Fetch content by address, verifying it still matches its hash
    pub fn get(&self, hash: &ContentHash) -> MigrateResult<Vec<u8>> {
        let path = self.blob_path(hash);
        if !path.exists() {
            return Err(MigrateError::backup(format!(
                "blob {} is missing from the object pool",
                hash.short()
            )));
        }

        let data = file_io::read_bytes(&path)
            .map_err(|e| MigrateError::backup(format!("Failed to read blob {}: {}", hash.short(), e)))?;

        if &ContentHash::compute(&data) != hash {
            return Err(MigrateError::backup(format!(
                "blob {} is corrupt: content does not match its address",
                hash.short()
            )));
        }

        Ok(data)
    }

    /// Whether a blob exists in the pool
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.blob_path(hash).exists()
    }

    /// Delete blobs no manifest references; returns how many were removed
    pub fn gc(&self, referenced: &HashSet<ContentHash>) -> MigrateResult<usize> {
        if !self.objects_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for shard in read_dir(&self.objects_dir)? {
            if !shard.is_dir() {
                continue;
            }
            let prefix = match shard.file_name().and_then(|n| n.to_str()) {
                Some(p) => p.to_string(),
                None => continue,
            };

            for blob in read_dir(&shard)? {
                let rest = match blob.file_name().and_then(|n| n.to_str()) {
                    Some(r) => r.to_string(),
                    None => continue,
                };
                let hash = ContentHash::from_hex(format!("{}{}", prefix, rest));
                if !referenced.contains(&hash) {
                    fs::remove_file(&blob).map_err(|e| {
                        MigrateError::backup(format!(
                            "Failed to remove unreferenced blob {}: {}",
                            hash.short(),
                            e
                        ))
                    })?;
                    removed += 1;
                }
            }

            // Drop the shard directory once it's empty
            let _ = fs::remove_dir(&shard);
        }

        Ok(removed)
    }

    /// Sharded path for a hash: `objects/ab/cdef...`
    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.as_str();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }
}

/// Collect a directory's entries, tolerating a missing directory
fn read_dir(dir: &Path) -> MigrateResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    let iter = fs::read_dir(dir)
        .map_err(|e| MigrateError::backup(format!("Failed to read {}: {}", dir.display(), e)))?;
    for entry in iter {
        let entry = entry
            .map_err(|e| MigrateError::backup(format!("Failed to read directory entry: {}", e)))?;
        entries.push(entry.path());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (BlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::new(temp_dir.path().join("objects"));
        (store, temp_dir)
    }

    #[test]
    fn test_put_and_get_round_trip() {
        let (store, _temp) = create_test_store();

        let hash = store.put(b"settings content").unwrap();
        assert!(store.contains(&hash));
        assert_eq!(store.get(&hash).unwrap(), b"settings content");
    }

    #[test]
    fn test_put_is_idempotent() {
        let (store, _temp) = create_test_store();

        let a = store.put(b"same").unwrap();
        let b = store.put(b"same").unwrap();
        assert_eq!(a, b);

        // Still exactly one blob on disk
        let shards: Vec<_> = fs::read_dir(store.objects_dir.as_path())
            .unwrap()
            .collect();
        assert_eq!(shards.len(), 1);
    }

    #[test]
    fn test_get_missing_blob() {
        let (store, _temp) = create_test_store();
        let err = store.get(&ContentHash::compute(b"never stored")).unwrap_err();
        assert!(err.is_backup());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_get_detects_corruption() {
        let (store, _temp) = create_test_store();
        let hash = store.put(b"intact").unwrap();

        // Corrupt the blob behind the store's back
        let hex = hash.as_str();
        let path = store.objects_dir.join(&hex[..2]).join(&hex[2..]);
        fs::write(&path, b"tampered").unwrap();

        let err = store.get(&hash).unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_sharded_layout() {
        let (store, _temp) = create_test_store();
        let hash = store.put(b"layout").unwrap();

        let hex = hash.as_str();
        let expected = store.objects_dir.join(&hex[..2]).join(&hex[2..]);
        assert!(expected.is_file());
    }

    #[test]
    fn test_gc_removes_only_unreferenced() {
        let (store, _temp) = create_test_store();

        let keep = store.put(b"still referenced").unwrap();
        let drop = store.put(b"orphaned").unwrap();

        let mut referenced = HashSet::new();
        referenced.insert(keep.clone());

        let removed = store.gc(&referenced).unwrap();
        assert_eq!(removed, 1);
        assert!(store.contains(&keep));
        assert!(!store.contains(&drop));
    }

    #[test]
    fn test_gc_on_missing_pool() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::new(temp_dir.path().join("never-created"));
        assert_eq!(store.gc(&HashSet::new()).unwrap(), 0);
    }
}
