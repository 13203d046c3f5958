//! Postgres-backed metadata store.

use crate::store::{FileStore, NewFileRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keydrop_core::{AppError, FileRecord};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row shape of the `files` table.
#[derive(Debug, sqlx::FromRow)]
struct FileRow {
    id: Uuid,
    keyword: String,
    file_name: String,
    content_type: String,
    size: i64,
    blob_key: String,
    uploaded_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            id: row.id,
            keyword: row.keyword,
            file_name: row.file_name,
            content_type: row.content_type,
            size: row.size,
            blob_key: row.blob_key,
            uploaded_at: row.uploaded_at,
            expires_at: row.expires_at,
        }
    }
}

/// Database failures are always retryable from the caller's perspective.
fn db_error(err: sqlx::Error) -> AppError {
    AppError::StorageUnavailable(format!("database error: {}", err))
}

#[derive(Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.operation = "insert", keyword = %record.keyword, file_name = %record.file_name))]
    async fn insert_one(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let id = Uuid::new_v4();

        let row: FileRow = sqlx::query_as::<Postgres, FileRow>(
            r#"
            INSERT INTO files (
                id, keyword, file_name, content_type, size,
                blob_key, uploaded_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.keyword)
        .bind(&record.file_name)
        .bind(&record.content_type)
        .bind(record.size)
        .bind(&record.blob_key)
        .bind(record.uploaded_at)
        .bind(record.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn find_live_by_keyword(
        &self,
        keyword: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, AppError> {
        let rows: Vec<FileRow> = sqlx::query_as::<Postgres, FileRow>(
            r#"
            SELECT * FROM files
            WHERE keyword = $1 AND expires_at > $2
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(keyword)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn find_live_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRow> = sqlx::query_as::<Postgres, FileRow>(
            r#"
            SELECT * FROM files
            WHERE keyword = $1 AND file_name = $2 AND expires_at > $3
            ORDER BY uploaded_at DESC
            LIMIT 1
            "#,
        )
        .bind(keyword)
        .bind(file_name)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    async fn delete_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM files
            WHERE keyword = $1 AND file_name = $2 AND expires_at > $3
            "#,
        )
        .bind(keyword)
        .bind(file_name)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    async fn delete_by_keyword(&self, keyword: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM files WHERE keyword = $1")
            .bind(keyword)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<FileRecord>, AppError> {
        let rows: Vec<FileRow> = sqlx::query_as::<Postgres, FileRow>(
            r#"
            SELECT * FROM files
            WHERE expires_at <= $1
            ORDER BY expires_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
