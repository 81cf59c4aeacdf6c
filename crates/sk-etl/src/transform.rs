//! Record Transformers: one input file in, target-table rows out.
//!
//! Both transformers take the connection explicitly and leave commit
//! boundaries to the caller (see [`crate::batch`]).

use crate::error::{EtlError, EtlResult};
use crate::resolve::resolve_play;
use crate::sql::{insert_artist, insert_song, insert_songplay, insert_time, upsert_user};
use serde_json::Value;
use sk_core::{LogEvent, PlayEvent, SongRecord, SongplayRow};
use sk_db::Database;
use std::ops::AddAssign;
use std::path::Path;

/// Rows written while transforming one or more files.
///
/// Counts are affected rows as reported by the database, so a conflicting
/// insert that was ignored counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Records read from the file, before filtering
    pub records: usize,
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time_rows: usize,
    pub songplays: usize,
    /// Songplays inserted without a song/artist match
    pub unresolved: usize,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.songs += other.songs;
        self.artists += other.artists;
        self.users += other.users;
        self.time_rows += other.time_rows;
        self.songplays += other.songplays;
        self.unresolved += other.unresolved;
    }
}

fn read_file(path: &Path) -> EtlResult<String> {
    std::fs::read_to_string(path).map_err(|e| EtlError::io(path, e))
}

/// Parse a song file that must hold exactly one record.
pub fn parse_song_file(path: &Path) -> EtlResult<SongRecord> {
    let content = read_file(path)?;
    let values = serde_json::Deserializer::from_str(&content)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EtlError::malformed(path, Some(e.line()), e))?;

    let value = match <[Value; 1]>::try_from(values) {
        Ok([value]) => value,
        Err(values) if values.is_empty() => {
            return Err(EtlError::malformed(path, None, "file contains no song record"));
        }
        Err(values) => {
            return Err(EtlError::malformed(
                path,
                None,
                format!("expected exactly one song record, found {}", values.len()),
            ));
        }
    };

    let record: SongRecord =
        serde_json::from_value(value).map_err(|e| EtlError::malformed(path, None, e))?;
    record
        .validate()
        .map_err(|e| EtlError::malformed(path, None, e))?;
    Ok(record)
}

/// Insert the song and artist rows described by one song file.
pub fn process_song_file(db: &dyn Database, path: &Path) -> EtlResult<FileStats> {
    let record = parse_song_file(path)?;

    let songs = insert_song(db, &record.song_row()).map_err(EtlError::load(path))?;
    let artists = insert_artist(db, &record.artist_row()).map_err(EtlError::load(path))?;

    Ok(FileStats {
        records: 1,
        songs,
        artists,
        ..FileStats::default()
    })
}

/// Parse a JSON-lines log file and keep its playback events.
///
/// Returns the number of records read alongside the validated plays.
pub fn parse_log_file(path: &Path) -> EtlResult<(usize, Vec<PlayEvent>)> {
    let content = read_file(path)?;
    let mut records = 0;
    let mut plays = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        records += 1;

        let event: LogEvent = serde_json::from_str(line)
            .map_err(|e| EtlError::malformed(path, Some(line_no), e))?;
        if !event.is_next_song() {
            continue;
        }
        let play = event
            .into_play()
            .map_err(|e| EtlError::malformed(path, Some(line_no), e))?;
        plays.push(play);
    }

    Ok((records, plays))
}

/// Load the playback events of one log file.
///
/// Time rows go first so every songplay references an existing timestamp,
/// then user upserts (last write wins), then one songplay per event.
pub fn process_log_file(db: &dyn Database, path: &Path) -> EtlResult<FileStats> {
    let (records, plays) = parse_log_file(path)?;
    let mut stats = FileStats {
        records,
        ..FileStats::default()
    };

    if plays.is_empty() {
        log::debug!("{}: no NextSong events", path.display());
        return Ok(stats);
    }

    for play in &plays {
        stats.time_rows += insert_time(db, &play.time).map_err(EtlError::load(path))?;
    }

    for play in &plays {
        stats.users += upsert_user(db, &play.user).map_err(EtlError::load(path))?;
    }

    for play in plays {
        let found = resolve_play(db, &play).map_err(EtlError::load(path))?;
        if !found.is_resolved() {
            stats.unresolved += 1;
        }

        let row = SongplayRow {
            start_time: play.time.start_time,
            user_id: play.user.user_id,
            level: play.user.level,
            song_id: found.song_id().map(String::from),
            artist_id: found.artist_id().map(String::from),
            session_id: play.session_id,
            location: play.location,
            user_agent: play.user_agent,
        };
        stats.songplays += insert_songplay(db, &row).map_err(EtlError::load(path))?;
    }

    log::debug!(
        "{}: {} plays, {} unresolved",
        path.display(),
        stats.songplays,
        stats.unresolved
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
