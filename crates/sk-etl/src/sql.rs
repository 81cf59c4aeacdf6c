//! Insert and lookup statements, one typed query per target table.

use sk_core::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use sk_db::{Database, DbResult, Query, SqlValue};

pub const SONG_INSERT: Query<5> = Query::new(
    "INSERT INTO songs (song_id, title, artist_id, year, duration)
     VALUES (?, ?, ?, ?, ?)
     ON CONFLICT (song_id) DO NOTHING",
);

pub const ARTIST_INSERT: Query<5> = Query::new(
    "INSERT INTO artists (artist_id, name, location, latitude, longitude)
     VALUES (?, ?, ?, ?, ?)
     ON CONFLICT (artist_id) DO NOTHING",
);

pub const USER_UPSERT: Query<5> = Query::new(
    "INSERT INTO users (user_id, first_name, last_name, gender, level)
     VALUES (?, ?, ?, ?, ?)
     ON CONFLICT (user_id) DO UPDATE SET
         first_name = EXCLUDED.first_name,
         last_name = EXCLUDED.last_name,
         gender = EXCLUDED.gender,
         level = EXCLUDED.level",
);

pub const TIME_INSERT: Query<7> = Query::new(
    "INSERT INTO \"time\" (start_time, hour, day, week, month, year, weekday)
     VALUES (?, ?, ?, ?, ?, ?, ?)
     ON CONFLICT (start_time) DO NOTHING",
);

pub const SONGPLAY_INSERT: Query<8> = Query::new(
    "INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
);

/// Title, artist name, duration, tolerance
pub const SONG_SELECT: Query<4> = Query::new(
    "SELECT s.song_id, a.artist_id
     FROM songs s
     JOIN artists a ON s.artist_id = a.artist_id
     WHERE s.title = ? AND a.name = ? AND ABS(s.duration - ?) <= ?
     ORDER BY s.song_id
     LIMIT 1",
);

pub fn insert_song(db: &dyn Database, row: &SongRow) -> DbResult<usize> {
    SONG_INSERT.execute(
        db,
        [
            row.song_id.as_str().into(),
            row.title.as_str().into(),
            row.artist_id.as_str().into(),
            row.year.into(),
            row.duration.into(),
        ],
    )
}

pub fn insert_artist(db: &dyn Database, row: &ArtistRow) -> DbResult<usize> {
    ARTIST_INSERT.execute(
        db,
        [
            row.artist_id.as_str().into(),
            row.name.as_str().into(),
            row.location.as_deref().into(),
            row.latitude.into(),
            row.longitude.into(),
        ],
    )
}

pub fn upsert_user(db: &dyn Database, row: &UserRow) -> DbResult<usize> {
    USER_UPSERT.execute(
        db,
        [
            row.user_id.into(),
            row.first_name.as_deref().into(),
            row.last_name.as_deref().into(),
            row.gender.as_deref().into(),
            row.level.as_str().into(),
        ],
    )
}

pub fn insert_time(db: &dyn Database, row: &TimeRow) -> DbResult<usize> {
    TIME_INSERT.execute(
        db,
        [
            row.start_time.into(),
            row.hour.into(),
            row.day.into(),
            row.week.into(),
            row.month.into(),
            row.year.into(),
            row.weekday.into(),
        ],
    )
}

pub fn insert_songplay(db: &dyn Database, row: &SongplayRow) -> DbResult<usize> {
    SONGPLAY_INSERT.execute(
        db,
        [
            row.start_time.into(),
            row.user_id.into(),
            row.level.as_str().into(),
            row.song_id.as_deref().into(),
            row.artist_id.as_deref().into(),
            row.session_id.into(),
            row.location.as_deref().into(),
            row.user_agent.as_deref().into(),
        ],
    )
}

/// Parameters for [`SONG_SELECT`]
pub(crate) fn song_select_params(
    title: &str,
    artist_name: &str,
    duration: f64,
    tolerance: f64,
) -> [SqlValue; 4] {
    [
        title.into(),
        artist_name.into(),
        duration.into(),
        tolerance.into(),
    ]
}
