//! Archive creation service
//!
//! Builds ZIP archives from stored blobs for the download-all operation.

pub use service::create_zip_archive;

mod service;
