//! sk-db - Database abstraction layer for Sparkify
//!
//! This crate provides the `Database` trait every component receives as an
//! explicit handle, the typed [`Query`] contract, and the DuckDB backend.

pub mod duckdb;
pub mod error;
pub mod query;
pub mod traits;
pub mod value;

pub use self::duckdb::{connect, drop_database, DuckDbBackend};
pub use error::{DbError, DbResult};
pub use query::Query;
pub use traits::Database;
pub use value::{Row, SqlValue};
