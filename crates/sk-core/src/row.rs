//! Row tuples for the star schema.
//!
//! Field order on each struct matches the column order of its INSERT
//! statement.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Row of the `songs` dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// Row of the `artists` dimension
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row of the `users` dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

/// Row of the `time` dimension, derived from one event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week of year
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Monday = 0 ... Sunday = 6
    pub weekday: u32,
}

impl TimeRow {
    /// Decompose a calendar timestamp into its time-dimension fields.
    pub fn from_datetime(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        }
    }

    /// Derive a time row from a UTC millisecond epoch.
    pub fn from_millis(millis: i64) -> CoreResult<Self> {
        let start_time = DateTime::from_timestamp_millis(millis)
            .ok_or(CoreError::TimestampOutOfRange { millis })?
            .naive_utc();
        Ok(Self::from_datetime(start_time))
    }
}

/// Row of the `songplays` fact table
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
