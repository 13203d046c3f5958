//! Lifecycle service tests over in-memory stores and a manual clock.

use chrono::{Duration, TimeZone, Utc};
use keydrop_core::{AppError, FixedClock};
use keydrop_db::MemoryFileStore;
use keydrop_services::{FileLifecycleService, UploadRequest};
use keydrop_storage::MemoryStorage;
use std::sync::Arc;

struct Harness {
    service: FileLifecycleService,
    store: Arc<MemoryFileStore>,
    storage: Arc<MemoryStorage>,
    clock: Arc<FixedClock>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryFileStore::new());
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap(),
    ));
    let service = FileLifecycleService::new(store.clone(), storage.clone(), clock.clone());
    Harness {
        service,
        store,
        storage,
        clock,
    }
}

#[tokio::test]
async fn upload_then_list_shows_record_with_exact_ttl() {
    let h = harness();

    let record = h
        .service
        .upload("team-q1", "report.pdf", "application/pdf", vec![0u8; 64])
        .await
        .unwrap();
    assert_eq!(record.expires_at, record.uploaded_at + Duration::hours(24));

    let listed = h.service.list_by_keyword("team-q1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].file_name, "report.pdf");
    assert_eq!(listed[0].size, 64);
}

#[tokio::test]
async fn list_is_ordered_newest_first() {
    let h = harness();

    h.service
        .upload("team-q1", "first.txt", "text/plain", b"1".to_vec())
        .await
        .unwrap();
    h.clock.advance(Duration::minutes(5));
    h.service
        .upload("team-q1", "second.txt", "text/plain", b"2".to_vec())
        .await
        .unwrap();

    let listed = h.service.list_by_keyword("team-q1").await.unwrap();
    assert_eq!(listed[0].file_name, "second.txt");
    assert_eq!(listed[1].file_name, "first.txt");
}

#[tokio::test]
async fn list_never_returns_expired_records() {
    let h = harness();

    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![0u8; 8])
        .await
        .unwrap();

    h.clock.advance(Duration::hours(25));
    assert!(h.service.list_by_keyword("team-q1").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_keyword_lists_empty_not_error() {
    let h = harness();
    assert!(h.service.list_by_keyword("never-used").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_live_upload_is_conflict() {
    let h = harness();

    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![1])
        .await
        .unwrap();

    let second = h
        .service
        .upload("team-q1", "report.pdf", "application/pdf", vec![2])
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn expired_name_is_reusable_before_sweep() {
    let h = harness();

    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![1])
        .await
        .unwrap();
    h.clock.advance(Duration::hours(25));

    // The expired record does not block the name; two metadata records now
    // point at the same blob path, the newer write winning at the blob layer.
    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![2])
        .await
        .unwrap();
    assert_eq!(h.store.record_count(), 2);

    assert_eq!(h.service.expire_sweep().await.unwrap(), 1);
    let listed = h.service.list_by_keyword("team-q1").await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn delete_one_is_not_idempotent() {
    let h = harness();

    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![1])
        .await
        .unwrap();

    h.service.delete_one("team-q1", "report.pdf").await.unwrap();
    assert!(!h.storage.has_blob("files/team-q1/report.pdf"));

    let second = h.service.delete_one("team-q1", "report.pdf").await;
    assert!(matches!(second, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_all_removes_everything_and_is_idempotent() {
    let h = harness();

    h.service
        .upload("team-q1", "a.txt", "text/plain", vec![1])
        .await
        .unwrap();
    h.service
        .upload("team-q1", "b.txt", "text/plain", vec![2])
        .await
        .unwrap();
    h.service
        .upload("other", "c.txt", "text/plain", vec![3])
        .await
        .unwrap();

    assert_eq!(h.service.delete_all("team-q1").await.unwrap(), 2);
    assert!(h.service.list_by_keyword("team-q1").await.unwrap().is_empty());
    assert_eq!(h.storage.blob_count(), 1);

    // Soft empty result, not an error
    assert_eq!(h.service.delete_all("team-q1").await.unwrap(), 0);
}

#[tokio::test]
async fn delete_all_purges_expired_records_too() {
    let h = harness();

    h.service
        .upload("team-q1", "a.txt", "text/plain", vec![1])
        .await
        .unwrap();
    h.clock.advance(Duration::hours(25));

    assert_eq!(h.service.delete_all("team-q1").await.unwrap(), 1);
    assert_eq!(h.store.record_count(), 0);
}

#[tokio::test]
async fn expire_sweep_is_idempotent() {
    let h = harness();

    h.service
        .upload("team-q1", "a.txt", "text/plain", vec![1])
        .await
        .unwrap();
    h.service
        .upload("other", "b.txt", "text/plain", vec![2])
        .await
        .unwrap();

    h.clock.advance(Duration::hours(25));
    assert_eq!(h.service.expire_sweep().await.unwrap(), 2);
    assert_eq!(h.service.expire_sweep().await.unwrap(), 0);
    assert_eq!(h.storage.blob_count(), 0);
    assert_eq!(h.store.record_count(), 0);
}

#[tokio::test]
async fn keyword_is_case_insensitive() {
    let h = harness();

    h.service
        .upload("  Proj-1 ", "notes.txt", "text/plain", vec![1])
        .await
        .unwrap();

    let listed = h.service.list_by_keyword("proj-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].keyword, "proj-1");
    assert!(h.storage.has_blob("files/proj-1/notes.txt"));
}

#[tokio::test]
async fn rejection_boundaries() {
    let h = harness();

    // 2-char keyword
    let short = h.service.upload("ab", "a.txt", "text/plain", vec![1]).await;
    assert!(matches!(short, Err(AppError::InvalidKeyword(_))));

    // 10 MiB is accepted, 10 MiB + 1 is not
    let at_limit = h
        .service
        .upload("limits", "exact.bin", "application/octet-stream", vec![0u8; 10 * 1024 * 1024])
        .await;
    assert!(at_limit.is_ok());

    let over = h
        .service
        .upload("limits", "over.bin", "application/octet-stream", vec![0u8; 10 * 1024 * 1024 + 1])
        .await;
    assert!(matches!(over, Err(AppError::FileTooLarge { .. })));

    // Validation failures never touch either store
    assert_eq!(h.storage.blob_count(), 1);
    assert_eq!(h.store.record_count(), 1);
}

#[tokio::test]
async fn file_name_with_path_components_is_rejected() {
    let h = harness();
    let result = h
        .service
        .upload("team-q1", "../escape.txt", "text/plain", vec![1])
        .await;
    assert!(matches!(result, Err(AppError::InvalidFileName(_))));
}

#[tokio::test]
async fn download_url_for_live_file_only() {
    let h = harness();

    h.service
        .upload("team-q1", "report.pdf", "application/pdf", vec![1])
        .await
        .unwrap();

    let url = h.service.download_url("team-q1", "report.pdf").await.unwrap();
    assert!(url.contains("files/team-q1/report.pdf"));

    let missing = h.service.download_url("team-q1", "nope.pdf").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    h.clock.advance(Duration::hours(25));
    let expired = h.service.download_url("team-q1", "report.pdf").await;
    assert!(matches!(expired, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn upload_many_reports_per_file_outcomes() {
    let h = harness();

    let outcomes = h
        .service
        .upload_many(
            "team-q1",
            vec![
                UploadRequest {
                    file_name: "a.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    data: vec![1],
                },
                UploadRequest {
                    file_name: "a.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    data: vec![2],
                },
                UploadRequest {
                    file_name: "b.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    data: vec![3],
                },
            ],
        )
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(AppError::Conflict(_))));
    assert!(outcomes[2].result.is_ok());
}

#[tokio::test]
async fn download_all_archive_contains_live_files() {
    let h = harness();

    h.service
        .upload("team-q1", "a.txt", "text/plain", b"alpha".to_vec())
        .await
        .unwrap();
    h.service
        .upload("team-q1", "b.txt", "text/plain", b"beta".to_vec())
        .await
        .unwrap();

    let archive = h.service.download_all_archive("team-q1").await.unwrap();
    let reader = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
    assert_eq!(reader.len(), 2);

    let missing = h.service.download_all_archive("empty-kw").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn end_to_end_24h_lifecycle() {
    let h = harness();

    let record = h
        .service
        .upload("team-q1", "report.pdf", "application/pdf", vec![0u8; 2 * 1024 * 1024])
        .await
        .unwrap();
    assert_eq!(record.size, 2_097_152);

    let listed = h.service.list_by_keyword("team-q1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].file_name, "report.pdf");

    let url = h.service.download_url("team-q1", "report.pdf").await.unwrap();
    assert!(!url.is_empty());

    h.clock.advance(Duration::hours(25));

    assert!(h.service.list_by_keyword("team-q1").await.unwrap().is_empty());
    assert_eq!(h.service.expire_sweep().await.unwrap(), 1);
    assert_eq!(h.service.expire_sweep().await.unwrap(), 0);
    assert!(!h.storage.has_blob("files/team-q1/report.pdf"));
}
