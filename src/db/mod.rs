//! Database module
//!
//! Handles SQLite connection, migrations and demo data.

pub mod connection;
pub mod migrations;
pub mod seed;

pub use connection::{default_database_path, Database, DbError, DbResult, DATABASE_PATH_ENV};
