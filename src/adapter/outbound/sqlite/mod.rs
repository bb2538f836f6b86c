//! SQLite persistence for notification dedup records.

pub mod database;
pub mod store;

pub use database::connection::{create_pool, open, run_migrations, DbPool};
pub use store::SqliteDedupStore;
