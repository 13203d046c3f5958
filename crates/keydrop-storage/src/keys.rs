//! Shared key generation for storage backends.
//!
//! Key format: `files/{keyword}/{file_name}`. Every file uploaded under a
//! keyword shares the `files/{keyword}/` prefix, which is what delete-all and
//! the sweep enumerate.

/// Generate the blob key for a keyword/file pair.
pub fn blob_key(keyword: &str, file_name: &str) -> String {
    format!("files/{}/{}", keyword, file_name)
}

/// Prefix covering every blob stored under `keyword`.
pub fn keyword_prefix(keyword: &str) -> String {
    format!("files/{}/", keyword)
}

/// Reject keys that could escape the container on path-based backends.
pub fn validate_key(key: &str) -> Result<(), crate::traits::StorageError> {
    if key.contains("..") || key.starts_with('/') {
        return Err(crate::traits::StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_key_layout() {
        assert_eq!(blob_key("team-q1", "report.pdf"), "files/team-q1/report.pdf");
        assert_eq!(keyword_prefix("team-q1"), "files/team-q1/");
        assert!(blob_key("team-q1", "report.pdf").starts_with(&keyword_prefix("team-q1")));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("files/team-q1/report.pdf").is_ok());
        assert!(validate_key("files/../etc/passwd").is_err());
        assert!(validate_key("/files/x").is_err());
    }
}
