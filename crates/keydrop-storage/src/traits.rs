//! Storage abstraction trait
//!
//! This module defines the trait that all blob storage backends must implement.

use async_trait::async_trait;
use keydrop_core::StorageBackend;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob storage abstraction
///
/// All backends (S3, local filesystem, in-memory) implement this trait so the
/// lifecycle service can coordinate blobs and metadata without coupling to a
/// specific provider.
///
/// **Key format:** `files/{keyword}/{file_name}`. See the crate root
/// documentation and the `keys` module.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Make sure the backing container/bucket/directory exists.
    ///
    /// Called before the first write; safe to call repeatedly.
    async fn ensure_container(&self) -> StorageResult<()>;

    /// Write bytes at `key`, overwriting any existing blob. Returns the
    /// blob's canonical URL.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Read the full blob at `key`.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete the blob at `key`. Deleting an absent key is not an error at
    /// this layer; callers decide whether absence matters.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List all keys under `prefix`.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Generate a short-lived read-only URL for `key`.
    ///
    /// The URL is a capability token: anyone holding it can read the blob
    /// until it expires, independent of the file record's own TTL.
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
