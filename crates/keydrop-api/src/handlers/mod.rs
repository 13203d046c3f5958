pub mod delete;
pub mod download;
pub mod health;
pub mod list;
pub mod maintenance;
pub mod upload;
