//! sk-core - Core library for Sparkify
//!
//! This crate provides the project configuration, the serde types for the two
//! source data sets (song files and event logs), and the row tuples written to
//! the `songs`, `artists`, `users`, `time` and `songplays` tables.

pub mod config;
pub mod error;
pub mod record;
pub mod row;
pub(crate) mod serde_helpers;

pub use config::{Config, DEFAULT_EXTENSION, DEFAULT_PROBE_ARTIST, MEMORY_DB_PATH};
pub use error::{CoreError, CoreResult};
pub use record::{LogEvent, PlayEvent, SongRecord, NEXT_SONG_PAGE};
pub use row::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
