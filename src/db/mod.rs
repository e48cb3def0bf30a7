//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and repository inputs
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the customer repository over a shared pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Customer, CustomerChanges, NewCustomer};
pub use schema::{CUSTOMER_COLUMNS, SQLITE_CREATE_TABLE, SQLITE_INDEXES};
pub use sqlite::{CustomerStorage, SqlitePool};
