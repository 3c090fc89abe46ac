//! SQLite bootstrap for `SqliteDocumentStore`.
//!
//! Connections come back configured and migrated to the latest `documents`
//! schema; failures surface as `StoreError::Sqlite` or
//! `StoreError::SchemaTooNew`. The schema version lives in
//! `PRAGMA user_version`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
