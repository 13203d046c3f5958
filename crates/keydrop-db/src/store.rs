//! Metadata store seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keydrop_core::{AppError, FileRecord};

/// Fields for a record about to be inserted. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub keyword: String,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub blob_key: String,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Metadata store operations.
///
/// Liveness is always evaluated against a caller-supplied `now`: expiry is
/// reactive, so the store never consults the wall clock itself.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a record and return it with its assigned id.
    async fn insert_one(&self, record: NewFileRecord) -> Result<FileRecord, AppError>;

    /// All live records for a keyword, newest-first by upload time.
    async fn find_live_by_keyword(
        &self,
        keyword: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, AppError>;

    /// The live record for `(keyword, file_name)`, if any.
    async fn find_live_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<FileRecord>, AppError>;

    /// Delete the live record for `(keyword, file_name)`. Returns whether a
    /// record was deleted.
    async fn delete_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Delete every record for a keyword, live or expired. Returns the count.
    async fn delete_by_keyword(&self, keyword: &str) -> Result<u64, AppError>;

    /// All expired records (`expires_at <= now`), for the sweep.
    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<FileRecord>, AppError>;

    /// Delete a single record by id. Returns whether it existed.
    async fn delete_by_id(&self, id: uuid::Uuid) -> Result<bool, AppError>;
}
