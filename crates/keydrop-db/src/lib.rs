//! Keydrop Metadata Store
//!
//! One record per stored file, queryable by keyword and by expiry. The
//! [`FileStore`] trait is the seam between the lifecycle service and the
//! backing database: [`PgFileStore`] is the production Postgres
//! implementation, [`MemoryFileStore`] backs tests and local experiments.

mod memory;
mod postgres;
mod store;

pub use memory::MemoryFileStore;
pub use postgres::PgFileStore;
pub use store::{FileStore, NewFileRecord};
