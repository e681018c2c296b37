//! Filesystem-backed object store
//!
//! Lays a bucket out as a directory tree: each object key becomes a relative
//! file path under the bucket root.

use crate::storage::traits::{ObjectStore, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Object store writing into a local directory
#[derive(Debug)]
pub struct FsObjectStore {
    bucket: PathBuf,
}

impl FsObjectStore {
    /// Opens the bucket directory, creating it if missing
    pub fn open(bucket: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(bucket)?;
        Ok(Self {
            bucket: bucket.to_path_buf(),
        })
    }

    /// Root directory of the bucket
    pub fn bucket_path(&self) -> &Path {
        &self.bucket
    }

    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.bucket.join(key))
    }
}

impl ObjectStore for FsObjectStore {
    fn ensure_prefix(&self, prefix: &str) -> StorageResult<()> {
        let dir = self.resolve(prefix)?;
        std::fs::create_dir_all(dir)?;
        Ok(())
    }

    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// Rejects keys that would resolve outside the bucket
fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key cannot be empty".to_string()));
    }

    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "key cannot be absolute: '{}'",
            key
        )));
    }

    if key.ends_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "key cannot end with '/': '{}'",
            key
        )));
    }

    if key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "key cannot contain '..' segments: '{}'",
            key
        )));
    }

    Ok(())
}
