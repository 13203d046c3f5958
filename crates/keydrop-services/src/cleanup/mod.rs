//! Background cleanup of expired files.

pub use service::CleanupService;

mod service;
