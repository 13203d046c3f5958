//! Keydrop Services
//!
//! The file lifecycle orchestrator plus its two collaborating services: the
//! background cleanup loop and the ZIP archive builder. The orchestrator is
//! the single authority for keeping metadata records and blob bytes
//! consistent across upload, read, delete, and expiry.

pub mod archive;
pub mod cleanup;
pub mod lifecycle;

pub use cleanup::CleanupService;
pub use lifecycle::{FileLifecycleService, UploadOutcome, UploadRequest};
