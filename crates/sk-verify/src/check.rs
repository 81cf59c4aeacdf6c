//! The fixed smoke-test queries

use sk_db::{Database, DbResult, Query, Row};

pub use sk_core::DEFAULT_PROBE_ARTIST;

const ARTIST_PROBE: Query<1> = Query::new("SELECT * FROM artists WHERE name = ? LIMIT 1");
const USERS: Query<0> = Query::new("SELECT * FROM users LIMIT 1");
const SONGS: Query<0> = Query::new("SELECT * FROM songs LIMIT 1");
const ARTISTS: Query<0> = Query::new("SELECT * FROM artists LIMIT 1");
const TIME: Query<0> = Query::new("SELECT * FROM \"time\" LIMIT 1");
const SONGPLAYS: Query<0> = Query::new("SELECT * FROM songplays LIMIT 1");

/// Query shape of a check
#[derive(Debug, Clone, Copy)]
enum Probe {
    Table(Query<0>),
    ByArtistName(Query<1>),
}

/// One verification query and the table it covers
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub table: &'static str,
    probe: Probe,
}

impl Check {
    const fn table(name: &'static str, table: &'static str, query: Query<0>) -> Self {
        Self {
            name,
            table,
            probe: Probe::Table(query),
        }
    }

    pub fn sql(&self) -> &'static str {
        match self.probe {
            Probe::Table(q) => q.sql(),
            Probe::ByArtistName(q) => q.sql(),
        }
    }

    /// First row the check returns, if any
    pub fn first_row(&self, db: &dyn Database, probe_artist: &str) -> DbResult<Option<Row>> {
        match self.probe {
            Probe::Table(q) => q.fetch_one(db, []),
            Probe::ByArtistName(q) => q.fetch_one(db, [probe_artist.into()]),
        }
    }
}

/// Every check, in execution order
pub const CHECKS: [Check; 6] = [
    Check {
        name: "artist_by_name",
        table: "artists",
        probe: Probe::ByArtistName(ARTIST_PROBE),
    },
    Check::table("users_not_empty", "users", USERS),
    Check::table("songs_not_empty", "songs", SONGS),
    Check::table("artists_not_empty", "artists", ARTISTS),
    Check::table("time_not_empty", "time", TIME),
    Check::table("songplays_not_empty", "songplays", SONGPLAYS),
];
