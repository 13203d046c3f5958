use crate::keys::validate_key;
use crate::traits::{BlobStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Intended for development and tests. `presigned_url` returns a plain
/// `{base_url}/{key}` URL without signing; local deployments are expected to
/// serve the storage directory behind the same trust boundary as the API.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "/var/lib/keydrop/files")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, rejecting traversal sequences
    /// that could escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Collect keys for every regular file under `dir`, depth-first.
    async fn collect_keys(&self, dir: PathBuf, keys: &mut Vec<String>) -> StorageResult<()> {
        let mut stack = vec![dir];
        while let Some(current) = stack.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::from(e)),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    stack.push(path);
                } else if let Ok(relative) = path.strip_prefix(&self.base_path) {
                    keys.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn ensure_container(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Absent blob: nothing to do, the caller tracks liveness in metadata
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        validate_key(prefix)?;
        let dir = self.base_path.join(prefix.trim_end_matches('/'));
        let mut keys = Vec::new();
        self.collect_keys(dir, &mut keys).await?;
        // Directory walk order is filesystem-dependent
        keys.sort();
        Ok(keys)
    }

    async fn presigned_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(self.generate_url(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
            .await
            .expect("storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn test_put_download_delete_roundtrip() {
        let (_dir, storage) = storage().await;

        let url = storage
            .put("files/team-q1/a.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/files/files/team-q1/a.txt");

        let data = storage.download("files/team-q1/a.txt").await.unwrap();
        assert_eq!(data, b"hello");

        storage.delete("files/team-q1/a.txt").await.unwrap();
        assert!(matches!(
            storage.download("files/team-q1/a.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let (_dir, storage) = storage().await;
        assert!(storage.delete("files/team-q1/missing.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let (_dir, storage) = storage().await;

        storage
            .put("files/team-q1/a.txt", b"a".to_vec(), "text/plain")
            .await
            .unwrap();
        storage
            .put("files/team-q1/b.txt", b"b".to_vec(), "text/plain")
            .await
            .unwrap();
        storage
            .put("files/other/c.txt", b"c".to_vec(), "text/plain")
            .await
            .unwrap();

        let keys = storage.list("files/team-q1/").await.unwrap();
        assert_eq!(keys, vec!["files/team-q1/a.txt", "files/team-q1/b.txt"]);

        let empty = storage.list("files/unknown/").await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_presigned_url_requires_existing_blob() {
        let (_dir, storage) = storage().await;
        assert_eq!(storage.backend_type(), StorageBackend::Local);

        storage
            .put("files/team-q1/a.txt", b"a".to_vec(), "text/plain")
            .await
            .unwrap();

        let url = storage
            .presigned_url("files/team-q1/a.txt", Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/files/files/team-q1/a.txt");

        assert!(matches!(
            storage
                .presigned_url("files/team-q1/missing.txt", Duration::from_secs(900))
                .await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (_dir, storage) = storage().await;
        assert!(matches!(
            storage.put("../escape.txt", b"x".to_vec(), "text/plain").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
