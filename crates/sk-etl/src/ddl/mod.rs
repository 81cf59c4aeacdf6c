//! Embedded DDL for the star schema.
//!
//! The statements live in `.sql` files embedded via `include_str!` and are
//! executed by [`crate::schema`].

/// Drops every table (fact table first) and the songplay id sequence.
pub const DROP_TABLES: &str = include_str!("drop_tables.sql");

/// Creates the sequence and all five tables with their keys.
pub const CREATE_TABLES: &str = include_str!("create_tables.sql");

/// Tables owned by the schema, dimensions before the fact table.
pub const TABLES: &[&str] = &["users", "songs", "artists", "time", "songplays"];
