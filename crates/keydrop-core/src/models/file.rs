use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored file: one metadata record plus one blob at `blob_key`.
///
/// Records are immutable once created; "replace" is delete-then-upload at a
/// higher layer. A record is *live* while `expires_at` is in the future;
/// expired records are invisible to reads and removed by the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    /// Lowercase namespace key shared by every file uploaded under it.
    pub keyword: String,
    /// Unique among live records within a keyword.
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    /// Location of the bytes in the blob store (`files/{keyword}/{file_name}`).
    pub blob_key: String,
    pub uploaded_at: DateTime<Utc>,
    /// Always `uploaded_at + 24h`; the sole TTL signal.
    pub expires_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Client-facing view of a stored file. The blob key stays internal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    pub keyword: String,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        FileResponse {
            keyword: record.keyword,
            file_name: record.file_name,
            content_type: record.content_type,
            size: record.size,
            uploaded_at: record.uploaded_at,
            expires_at: record.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            keyword: "team-q1".to_string(),
            file_name: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 2_097_152,
            blob_key: "files/team-q1/report.pdf".to_string(),
            uploaded_at: expires_at - Duration::hours(24),
            expires_at,
        }
    }

    #[test]
    fn test_is_live() {
        let now = Utc::now();
        assert!(record(now + Duration::hours(1)).is_live(now));
        assert!(!record(now).is_live(now));
        assert!(!record(now - Duration::seconds(1)).is_live(now));
    }

    #[test]
    fn test_file_response_from_record() {
        let rec = record(Utc::now() + Duration::hours(24));
        let response = FileResponse::from(rec.clone());

        assert_eq!(response.keyword, rec.keyword);
        assert_eq!(response.file_name, rec.file_name);
        assert_eq!(response.content_type, rec.content_type);
        assert_eq!(response.size, rec.size);
        assert_eq!(response.uploaded_at, rec.uploaded_at);
        assert_eq!(response.expires_at, rec.expires_at);
    }
}
