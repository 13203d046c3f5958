//! File lifecycle orchestration.

mod service;

pub use service::{FileLifecycleService, UploadOutcome, UploadRequest};
