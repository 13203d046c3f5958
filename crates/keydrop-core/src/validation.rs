//! Input validation for keywords and file names.
//!
//! Keywords are rejected before any store is touched. File names become blob
//! path segments, so they must not carry path components.

use crate::constants::{KEYWORD_MAX_LENGTH, KEYWORD_MIN_LENGTH};
use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid keyword regex"))
}

/// Trim, lowercase, and validate a user-supplied keyword.
///
/// Keywords are case-insensitive: `Proj-1` and `proj-1` address the same
/// namespace. Valid keywords are 3-50 characters of `[a-zA-Z0-9_-]`.
pub fn normalize_keyword(keyword: &str) -> Result<String, AppError> {
    let normalized = keyword.trim().to_lowercase();

    if normalized.len() < KEYWORD_MIN_LENGTH || normalized.len() > KEYWORD_MAX_LENGTH {
        return Err(AppError::InvalidKeyword(format!(
            "Keyword must be between {} and {} characters",
            KEYWORD_MIN_LENGTH, KEYWORD_MAX_LENGTH
        )));
    }

    if !keyword_pattern().is_match(&normalized) {
        return Err(AppError::InvalidKeyword(
            "Invalid keyword format. Use letters, numbers, underscores, and hyphens only"
                .to_string(),
        ));
    }

    Ok(normalized)
}

/// Validate a file name for use as a blob path segment.
pub fn validate_file_name(file_name: &str) -> Result<(), AppError> {
    if file_name.is_empty() {
        return Err(AppError::InvalidFileName(
            "File name must not be empty".to_string(),
        ));
    }

    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        return Err(AppError::InvalidFileName(format!(
            "File name '{}' contains path separators",
            file_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize_keyword("  Proj-1 ").unwrap(), "proj-1");
        assert_eq!(normalize_keyword("TEAM_Q1").unwrap(), "team_q1");
    }

    #[test]
    fn test_length_boundaries() {
        // 2 chars: too short
        assert!(matches!(
            normalize_keyword("ab"),
            Err(AppError::InvalidKeyword(_))
        ));
        // 3 chars: minimum
        assert!(normalize_keyword("abc").is_ok());
        // 50 chars: maximum
        assert!(normalize_keyword(&"a".repeat(50)).is_ok());
        // 51 chars: too long
        assert!(matches!(
            normalize_keyword(&"a".repeat(51)),
            Err(AppError::InvalidKeyword(_))
        ));
    }

    #[test]
    fn test_charset() {
        assert!(normalize_keyword("team-q1_2026").is_ok());
        assert!(normalize_keyword("team q1").is_err());
        assert!(normalize_keyword("team/q1").is_err());
        assert!(normalize_keyword("team.q1").is_err());
        assert!(normalize_keyword("\u{00e9}t\u{00e9}-photos").is_err());
    }

    #[test]
    fn test_file_name_rejects_path_components() {
        assert!(validate_file_name("report.pdf").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("../secret").is_err());
        assert!(validate_file_name("a/b.txt").is_err());
        assert!(validate_file_name("a\\b.txt").is_err());
    }
}
