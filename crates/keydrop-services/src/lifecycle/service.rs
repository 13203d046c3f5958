//! The file lifecycle orchestrator.
//!
//! Sequences every operation that touches both the metadata store and the
//! blob store so the two stay consistent: upload writes the blob before the
//! metadata record, deletes remove the blob before the record, and the sweep
//! purges expired records reactively. The service is stateless between calls
//! and owns no timers; "now" always comes from the injected [`Clock`].
//!
//! Known, accepted race: two concurrent uploads for the same
//! `(keyword, file_name)` can both pass the collision check before either
//! inserts metadata. Both writes target the same blob key, so the last blob
//! write wins at the storage layer and metadata may end up pointing at
//! either. There is no transactional guard across the two stores.

use chrono::Duration;
use keydrop_core::{
    constants, normalize_keyword, validate_file_name, AppError, Clock, FileRecord,
};
use keydrop_db::{FileStore, NewFileRecord};
use keydrop_storage::{keys, BlobStorage, StorageError};
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// One file in a multi-file upload batch.
#[derive(Debug)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Per-file result of a multi-file upload batch. One failing file never
/// aborts the rest of the batch.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<FileRecord, AppError>,
}

/// Blob store failures surface as retryable storage errors, except a missing
/// blob, which reads as the file being gone.
fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => AppError::NotFound(format!("Blob '{}' not found", key)),
        other => AppError::StorageUnavailable(other.to_string()),
    }
}

pub struct FileLifecycleService {
    store: Arc<dyn FileStore>,
    storage: Arc<dyn BlobStorage>,
    clock: Arc<dyn Clock>,
    max_file_size: usize,
    file_ttl: Duration,
    download_url_ttl: StdDuration,
}

impl FileLifecycleService {
    pub fn new(
        store: Arc<dyn FileStore>,
        storage: Arc<dyn BlobStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            storage,
            clock,
            max_file_size: constants::MAX_FILE_SIZE_BYTES,
            file_ttl: constants::file_ttl(),
            download_url_ttl: constants::DOWNLOAD_URL_TTL,
        }
    }

    /// Override the default limits (10 MiB cap, 24h TTL, 15min URLs).
    pub fn with_limits(
        mut self,
        max_file_size: usize,
        file_ttl: Duration,
        download_url_ttl: StdDuration,
    ) -> Self {
        self.max_file_size = max_file_size;
        self.file_ttl = file_ttl;
        self.download_url_ttl = download_url_ttl;
        self
    }

    /// Store one file under a keyword.
    ///
    /// Validation happens before any store is touched. The blob is written
    /// before the metadata record; if the insert then fails, the blob is
    /// deleted best-effort in the background and the error propagates. A
    /// crash in that window leaves an orphan blob, which is never listed or
    /// served and is left to out-of-band reconciliation.
    #[tracing::instrument(skip(self, data), fields(operation = "upload"))]
    pub async fn upload(
        &self,
        keyword: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<FileRecord, AppError> {
        let keyword = normalize_keyword(keyword)?;
        validate_file_name(file_name)?;

        let size = data.len();
        if size > self.max_file_size {
            return Err(AppError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        self.storage
            .ensure_container()
            .await
            .map_err(storage_error)?;

        let now = self.clock.now();

        // Only live records are collision candidates: a name freed by expiry
        // may be reused before the sweep runs.
        if self
            .store
            .find_live_one(&keyword, file_name, now)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "A file named '{}' already exists under keyword '{}'",
                file_name, keyword
            )));
        }

        let blob_key = keys::blob_key(&keyword, file_name);
        self.storage
            .put(&blob_key, data, content_type)
            .await
            .map_err(storage_error)?;

        let record = NewFileRecord {
            keyword: keyword.clone(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size: size as i64,
            blob_key: blob_key.clone(),
            uploaded_at: now,
            expires_at: now + self.file_ttl,
        };

        match self.store.insert_one(record).await {
            Ok(stored) => {
                tracing::info!(
                    keyword = %stored.keyword,
                    file_name = %stored.file_name,
                    size_bytes = stored.size,
                    expires_at = %stored.expires_at,
                    "File uploaded"
                );
                Ok(stored)
            }
            Err(e) => {
                // Reclaim the just-written blob so the insert failure does
                // not leave an orphan behind.
                let storage = self.storage.clone();
                tokio::spawn(async move {
                    if let Err(del_err) = storage.delete(&blob_key).await {
                        tracing::error!(
                            error = %del_err,
                            blob_key = %blob_key,
                            "Failed to clean up blob after metadata insert failure"
                        );
                    }
                });
                Err(e)
            }
        }
    }

    /// Store a batch of files under one keyword, reporting success or
    /// failure per file.
    pub async fn upload_many(
        &self,
        keyword: &str,
        files: Vec<UploadRequest>,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let result = self
                .upload(keyword, &file.file_name, &file.content_type, file.data)
                .await;
            outcomes.push(UploadOutcome {
                file_name: file.file_name,
                result,
            });
        }
        outcomes
    }

    /// All live files under a keyword, newest-first.
    ///
    /// An unknown keyword and a keyword whose files have all expired both
    /// return an empty list; the system does not track keyword existence
    /// separately.
    pub async fn list_by_keyword(&self, keyword: &str) -> Result<Vec<FileRecord>, AppError> {
        let keyword = normalize_keyword(keyword)?;
        self.store
            .find_live_by_keyword(&keyword, self.clock.now())
            .await
    }

    /// Delete one live file: blob first, then metadata.
    ///
    /// Not idempotent by design: a second call for the same file returns
    /// `NotFound`.
    #[tracing::instrument(skip(self), fields(operation = "delete_one"))]
    pub async fn delete_one(&self, keyword: &str, file_name: &str) -> Result<(), AppError> {
        let keyword = normalize_keyword(keyword)?;
        let now = self.clock.now();

        let record = self
            .store
            .find_live_one(&keyword, file_name, now)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No file '{}' under keyword '{}'",
                    file_name, keyword
                ))
            })?;

        self.storage
            .delete(&record.blob_key)
            .await
            .map_err(storage_error)?;

        // A concurrent delete or sweep may have won the race since the
        // lookup; that reads as NotFound, not a failure.
        if !self.store.delete_one(&keyword, file_name, now).await? {
            return Err(AppError::NotFound(format!(
                "No file '{}' under keyword '{}'",
                file_name, keyword
            )));
        }

        tracing::info!(keyword = %keyword, file_name = %file_name, "File deleted");
        Ok(())
    }

    /// Delete every blob under the keyword's prefix, then every metadata
    /// record (live or expired). Returns the number of records removed;
    /// zero is a soft empty result, keeping the operation idempotent.
    #[tracing::instrument(skip(self), fields(operation = "delete_all"))]
    pub async fn delete_all(&self, keyword: &str) -> Result<u64, AppError> {
        let keyword = normalize_keyword(keyword)?;

        let prefix = keys::keyword_prefix(&keyword);
        let blob_keys = self.storage.list(&prefix).await.map_err(storage_error)?;
        for key in &blob_keys {
            self.storage.delete(key).await.map_err(storage_error)?;
        }

        let deleted = self.store.delete_by_keyword(&keyword).await?;

        tracing::info!(
            keyword = %keyword,
            blobs = blob_keys.len(),
            records = deleted,
            "Deleted all files for keyword"
        );
        Ok(deleted)
    }

    /// Short-lived read-only URL for one live file.
    ///
    /// The URL is a capability token valid for its own TTL (15 minutes by
    /// default), independent of the record's 24h lifetime.
    pub async fn download_url(&self, keyword: &str, file_name: &str) -> Result<String, AppError> {
        let keyword = normalize_keyword(keyword)?;

        let record = self
            .store
            .find_live_one(&keyword, file_name, self.clock.now())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No file '{}' under keyword '{}'",
                    file_name, keyword
                ))
            })?;

        self.storage
            .presigned_url(&record.blob_key, self.download_url_ttl)
            .await
            .map_err(storage_error)
    }

    /// ZIP archive of every live file under the keyword. Files whose blob
    /// fetch fails are skipped, not fatal.
    pub async fn download_all_archive(&self, keyword: &str) -> Result<Vec<u8>, AppError> {
        let keyword = normalize_keyword(keyword)?;
        let records = self
            .store
            .find_live_by_keyword(&keyword, self.clock.now())
            .await?;

        if records.is_empty() {
            return Err(AppError::NotFound(format!(
                "No files under keyword '{}'",
                keyword
            )));
        }

        let entries = records
            .into_iter()
            .map(|r| (r.blob_key, r.file_name))
            .collect();
        crate::archive::create_zip_archive(self.storage.clone(), entries)
            .await
            .map_err(AppError::from)
    }

    /// Purge every expired record and its blob.
    ///
    /// Blob deletion is best-effort: a failure is logged and the metadata
    /// record is removed anyway, so a wedged blob store cannot pin expired
    /// metadata forever. Returns the number of records removed. Safe to run
    /// repeatedly; an immediate second run finds nothing and returns 0.
    #[tracing::instrument(skip(self), fields(operation = "expire_sweep"))]
    pub async fn expire_sweep(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        let expired = self.store.find_expired(now).await?;

        let mut removed = 0u64;
        for record in expired {
            tracing::info!(
                keyword = %record.keyword,
                file_name = %record.file_name,
                expires_at = %record.expires_at,
                "Purging expired file"
            );

            if let Err(e) = self.storage.delete(&record.blob_key).await {
                tracing::error!(
                    error = %e,
                    blob_key = %record.blob_key,
                    "Failed to delete expired blob, continuing with metadata removal"
                );
            }

            match self.store.delete_by_id(record.id).await {
                Ok(true) => removed += 1,
                // Already gone: a concurrent sweep or delete-all got there first
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        keyword = %record.keyword,
                        file_name = %record.file_name,
                        "Failed to delete expired metadata record"
                    );
                }
            }
        }

        tracing::info!(removed, "Expire sweep completed");
        Ok(removed)
    }
}
