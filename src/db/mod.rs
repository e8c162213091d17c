//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the insert payload
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: `RecordStore`, the pool-backed repository

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{IdentityRecord, NewIdentityRecord};
pub use schema::SQLITE_INIT;
pub use sqlite::{RecordStore, SqlitePool};
