//! Domain models

mod file;

pub use file::{FileRecord, FileResponse};
