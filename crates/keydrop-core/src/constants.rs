//! Shared constants for limits and lifecycle policy.

use chrono::Duration;
use std::time::Duration as StdDuration;

/// Maximum accepted size for a single uploaded file (10 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Minimum keyword length.
pub const KEYWORD_MIN_LENGTH: usize = 3;

/// Maximum keyword length.
pub const KEYWORD_MAX_LENGTH: usize = 50;

/// Lifetime of an uploaded file, measured from the moment its metadata
/// record is created. Expiry is reactive: records past this age are
/// filtered out of reads and purged by the sweep.
pub fn file_ttl() -> Duration {
    Duration::hours(24)
}

/// Default validity of a presigned download URL.
pub const DOWNLOAD_URL_TTL: StdDuration = StdDuration::from_secs(15 * 60);
