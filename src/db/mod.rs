//! Database module: models and schema for the password history.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the pooled store handle

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{GeneratedPassword, NewPassword, Page};
pub use schema::SQLITE_INIT;
pub use sqlite::{PasswordStore, SqlitePool};
