//! Fact Resolver: song/artist ids for a played track.

use crate::sql::{song_select_params, SONG_SELECT};
use sk_core::PlayEvent;
use sk_db::{Database, DbResult};

/// Largest duration difference, in seconds, still treated as the same track.
///
/// Absorbs float drift between the log's `length` and the stored `duration`.
pub const DURATION_TOLERANCE: f64 = 0.001;

/// Outcome of a song lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongMatch {
    Resolved { song_id: String, artist_id: String },
    Unresolved,
}

impl SongMatch {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SongMatch::Resolved { .. })
    }

    pub fn song_id(&self) -> Option<&str> {
        match self {
            SongMatch::Resolved { song_id, .. } => Some(song_id),
            SongMatch::Unresolved => None,
        }
    }

    pub fn artist_id(&self) -> Option<&str> {
        match self {
            SongMatch::Resolved { artist_id, .. } => Some(artist_id),
            SongMatch::Unresolved => None,
        }
    }
}

/// Look up `(song_id, artist_id)` by exact title and artist name and a
/// duration within [`DURATION_TOLERANCE`]. No match is `Unresolved`, not an
/// error.
pub fn resolve_song(
    db: &dyn Database,
    title: &str,
    artist_name: &str,
    duration: f64,
) -> DbResult<SongMatch> {
    let params = song_select_params(title, artist_name, duration, DURATION_TOLERANCE);
    let Some(row) = SONG_SELECT.fetch_one(db, params)? else {
        return Ok(SongMatch::Unresolved);
    };

    match (row.get_str(0)?, row.get_str(1)?) {
        (Some(song_id), Some(artist_id)) => Ok(SongMatch::Resolved {
            song_id: song_id.to_string(),
            artist_id: artist_id.to_string(),
        }),
        _ => Ok(SongMatch::Unresolved),
    }
}

/// Resolve a playback event; events without song, artist or length are
/// `Unresolved` without querying.
pub fn resolve_play(db: &dyn Database, play: &PlayEvent) -> DbResult<SongMatch> {
    match (play.song.as_deref(), play.artist.as_deref(), play.length) {
        (Some(title), Some(artist), Some(length)) => resolve_song(db, title, artist, length),
        _ => Ok(SongMatch::Unresolved),
    }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
