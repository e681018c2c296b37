//! Storage traits and error types
//!
//! This module defines the trait interface for object store backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for object store backends
///
/// An object store is a single bucket addressed by slash-separated relative
/// keys. The archive writes artifacts under its configured prefixes and the
/// CSV exports at fixed keys; a `put` replaces whatever the key held before.
pub trait ObjectStore {
    /// Makes sure a key prefix exists in the bucket
    ///
    /// Backends without real directories may treat this as a no-op.
    fn ensure_prefix(&self, prefix: &str) -> StorageResult<()>;

    /// Writes an object, replacing any previous content at the key
    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()>;
}
