//! Source record types for song files and event logs.

use crate::error::{CoreError, CoreResult};
use crate::row::{ArtistRow, SongRow, TimeRow, UserRow};
use crate::serde_helpers::{lenient_i64, non_empty_string};
use serde::Deserialize;

/// `page` value of a playback event
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// One song metadata document: a single song and its artist.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
    pub duration: f64,
    pub year: i32,
}

impl SongRecord {
    /// Reject records whose keys are blank.
    pub fn validate(&self) -> CoreResult<()> {
        if self.song_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "song_id" });
        }
        if self.artist_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "artist_id" });
        }
        Ok(())
    }

    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// One line of an event log.
///
/// Only `page` is meaningful for every event type; the remaining fields are
/// optional here and enforced by [`LogEvent::into_play`] for playback events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub session_id: Option<i64>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub user_agent: Option<String>,
}

impl LogEvent {
    /// Whether this event is an actual song playback.
    pub fn is_next_song(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }

    /// Extract the rows a playback event contributes.
    ///
    /// Fails with [`CoreError::MissingField`] when a column the schema
    /// declares `NOT NULL` has no value.
    pub fn into_play(self) -> CoreResult<PlayEvent> {
        let ts = self.ts.ok_or(CoreError::MissingField { field: "ts" })?;
        let user_id = self
            .user_id
            .ok_or(CoreError::MissingField { field: "userId" })?;
        let level = self.level.ok_or(CoreError::MissingField { field: "level" })?;
        let session_id = self
            .session_id
            .ok_or(CoreError::MissingField { field: "sessionId" })?;

        Ok(PlayEvent {
            time: TimeRow::from_millis(ts)?,
            user: UserRow {
                user_id,
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                level,
            },
            song: self.song,
            artist: self.artist,
            length: self.length,
            session_id,
            location: self.location,
            user_agent: self.user_agent,
        })
    }
}

/// A validated playback event, ready for dimension upserts and fact lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub time: TimeRow,
    pub user: UserRow,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
