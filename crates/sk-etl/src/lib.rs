//! sk-etl - Sparkify load pipeline
//!
//! Turns song metadata files and event logs into rows of the star schema:
//! - [`schema`]: explicit, destructive schema reset
//! - [`transform`]: per-file record transformers
//! - [`resolve`]: song/artist lookup for playback events
//! - [`batch`]: file discovery and per-file commits
//! - [`regenerate`]: reset, load and verify in one run

pub mod batch;
pub mod ddl;
pub mod error;
pub mod regenerate;
pub mod resolve;
pub mod schema;
pub mod sql;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use batch::{
    discover_files, load_all, load_data_set, process_data, BatchSummary, DataSet, LoadProgress,
    LoadSummary, LogProgress, Transformer, DEFAULT_EXTENSION,
};
pub use error::{EtlError, EtlResult};
pub use regenerate::{
    regenerate, RegenerationError, RegenerationOptions, RegenerationReport, Stage, StageFailure,
};
pub use resolve::{resolve_play, resolve_song, SongMatch, DURATION_TOLERANCE};
pub use schema::{create_tables, drop_tables, missing_tables, reset_schema};
pub use transform::{process_log_file, process_song_file, FileStats};
