//! In-memory blob storage.
//!
//! Backs the lifecycle service tests and can serve as a throwaway backend in
//! local experiments. Blobs live in a `HashMap` behind a mutex; presigned
//! URLs are synthetic `memory://` URIs.

use crate::traits::{BlobStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a blob exists (for test assertions).
    pub fn has_blob(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    /// Get blob bytes (for test assertions).
    pub fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    /// Number of stored blobs.
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn ensure_container(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), data);
        Ok(format!("memory://{}", key))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .blobs
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if !self.has_blob(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!("memory://{}?expires={}", key, expires_in.as_secs()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.backend_type(), StorageBackend::Local);

        storage
            .put("files/abc/x.txt", b"data".to_vec(), "text/plain")
            .await
            .unwrap();
        assert!(storage.has_blob("files/abc/x.txt"));
        assert_eq!(storage.download("files/abc/x.txt").await.unwrap(), b"data");

        // Overwrite at the same key: last write wins
        storage
            .put("files/abc/x.txt", b"data2".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(
            storage.get_blob("files/abc/x.txt"),
            Some(b"data2".to_vec())
        );

        let url = storage
            .presigned_url("files/abc/x.txt", Duration::from_secs(900))
            .await
            .unwrap();
        assert!(url.contains("expires=900"));

        storage.delete("files/abc/x.txt").await.unwrap();
        assert!(!storage.has_blob("files/abc/x.txt"));
        assert!(matches!(
            storage.presigned_url("files/abc/x.txt", Duration::from_secs(900)).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let storage = MemoryStorage::new();
        storage.put("files/a/1", vec![1], "x").await.unwrap();
        storage.put("files/a/2", vec![2], "x").await.unwrap();
        storage.put("files/b/3", vec![3], "x").await.unwrap();

        assert_eq!(storage.list("files/a/").await.unwrap().len(), 2);
        assert_eq!(storage.list("files/b/").await.unwrap().len(), 1);
        assert!(storage.list("files/c/").await.unwrap().is_empty());
    }
}
