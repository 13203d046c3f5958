//! In-memory metadata store for tests and local experiments.

use crate::store::{FileStore, NewFileRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keydrop_core::{AppError, FileRecord};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryFileStore {
    records: Arc<Mutex<Vec<FileRecord>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total record count, live and expired (for test assertions).
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn insert_one(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let stored = FileRecord {
            id: Uuid::new_v4(),
            keyword: record.keyword,
            file_name: record.file_name,
            content_type: record.content_type,
            size: record.size,
            blob_key: record.blob_key,
            uploaded_at: record.uploaded_at,
            expires_at: record.expires_at,
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_live_by_keyword(
        &self,
        keyword: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, AppError> {
        let mut matches: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.keyword == keyword && r.is_live(now))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(matches)
    }

    async fn find_live_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<FileRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.keyword == keyword && r.file_name == file_name && r.is_live(now))
            .max_by_key(|r| r.uploaded_at)
            .cloned())
    }

    async fn delete_one(
        &self,
        keyword: &str,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.keyword == keyword && r.file_name == file_name && r.is_live(now)));
        Ok(records.len() < before)
    }

    async fn delete_by_keyword(&self, keyword: &str) -> Result<u64, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.keyword != keyword);
        Ok((before - records.len()) as u64)
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<FileRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.is_live(now))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_record(keyword: &str, file_name: &str, now: DateTime<Utc>) -> NewFileRecord {
        NewFileRecord {
            keyword: keyword.to_string(),
            file_name: file_name.to_string(),
            content_type: "text/plain".to_string(),
            size: 5,
            blob_key: format!("files/{}/{}", keyword, file_name),
            uploaded_at: now,
            expires_at: now + Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_live() {
        let store = MemoryFileStore::new();
        let now = Utc::now();

        let rec = store.insert_one(new_record("abc", "a.txt", now)).await.unwrap();
        assert_eq!(rec.keyword, "abc");

        let live = store.find_live_by_keyword("abc", now).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, rec.id);
    }

    #[tokio::test]
    async fn test_live_ordering_newest_first() {
        let store = MemoryFileStore::new();
        let now = Utc::now();

        store.insert_one(new_record("abc", "old.txt", now)).await.unwrap();
        store
            .insert_one(new_record("abc", "new.txt", now + Duration::minutes(5)))
            .await
            .unwrap();

        let live = store
            .find_live_by_keyword("abc", now + Duration::minutes(10))
            .await
            .unwrap();
        assert_eq!(live[0].file_name, "new.txt");
        assert_eq!(live[1].file_name, "old.txt");
    }

    #[tokio::test]
    async fn test_expired_records_are_invisible_but_present() {
        let store = MemoryFileStore::new();
        let now = Utc::now();

        store.insert_one(new_record("abc", "a.txt", now)).await.unwrap();
        let later = now + Duration::hours(25);

        assert!(store.find_live_by_keyword("abc", later).await.unwrap().is_empty());
        assert!(store.find_live_one("abc", "a.txt", later).await.unwrap().is_none());
        assert_eq!(store.find_expired(later).await.unwrap().len(), 1);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_one_only_touches_live_records() {
        let store = MemoryFileStore::new();
        let now = Utc::now();

        store.insert_one(new_record("abc", "a.txt", now)).await.unwrap();
        let later = now + Duration::hours(25);

        // expired record is not deletable through delete_one
        assert!(!store.delete_one("abc", "a.txt", later).await.unwrap());
        assert!(store.delete_one("abc", "a.txt", now).await.unwrap());
        assert!(!store.delete_one("abc", "a.txt", now).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_keyword_removes_expired_too() {
        let store = MemoryFileStore::new();
        let now = Utc::now();

        store.insert_one(new_record("abc", "a.txt", now - Duration::hours(30))).await.unwrap();
        store.insert_one(new_record("abc", "b.txt", now)).await.unwrap();
        store.insert_one(new_record("xyz", "c.txt", now)).await.unwrap();

        assert_eq!(store.delete_by_keyword("abc").await.unwrap(), 2);
        assert_eq!(store.record_count(), 1);
        assert_eq!(store.delete_by_keyword("abc").await.unwrap(), 0);
    }
}
