//! Keydrop Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Keydrop components.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileRecord, FileResponse};
pub use validation::{normalize_keyword, validate_file_name};
