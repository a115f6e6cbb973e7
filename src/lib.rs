pub mod backup;
pub mod config;
pub mod db;
pub mod observability;
pub mod store;
pub mod usecase;

pub use backup::SqliteBackup;
pub use config::Config;
pub use db::{create_pool, migrate};
pub use store::SqliteStore;
