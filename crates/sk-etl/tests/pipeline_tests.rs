//! End-to-end tests for the load pipeline.
//!
//! Each test writes song and log fixtures into a temp directory, resets an
//! in-memory schema, loads the fixtures and checks the stored rows.

use chrono::{Datelike, Timelike};
use sk_db::Database;
use sk_etl::{
    load_all, process_data, reset_schema, DataSet, EtlError, LoadSummary, LogProgress,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────────────

fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        init_logging();
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn song_root(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    fn log_root(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    fn write(&self, path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn song(
        &self,
        rel: &str,
        song_id: &str,
        title: &str,
        artist_id: &str,
        artist: &str,
        duration: f64,
    ) {
        let json = format!(
            r#"{{"num_songs":1,"artist_id":"{artist_id}","artist_latitude":null,"artist_longitude":null,"artist_location":"","artist_name":"{artist}","song_id":"{song_id}","title":"{title}","duration":{duration},"year":2000}}"#
        );
        self.write(&self.song_root().join(rel), &json);
    }

    fn log(&self, rel: &str, lines: &[String]) {
        self.write(&self.log_root().join(rel), &lines.join("\n"));
    }

    fn load(&self, db: &dyn Database) -> LoadSummary {
        load_all(db, &self.song_root(), &self.log_root(), "json", &LogProgress).unwrap()
    }
}

fn play(ts: i64, user_id: &str, level: &str, song: &str, artist: &str, length: f64) -> String {
    format!(
        r#"{{"artist":"{artist}","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":1,"lastName":"Koch","length":{length},"level":"{level}","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"NextSong","registration":1541048010796,"sessionId":818,"song":"{song}","status":200,"ts":{ts},"userAgent":"Mozilla/5.0","userId":"{user_id}"}}"#
    )
}

fn page(ts: i64, page: &str) -> String {
    format!(
        r#"{{"artist":null,"auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":0,"lastName":"Koch","length":null,"level":"paid","location":null,"method":"GET","page":"{page}","registration":null,"sessionId":818,"song":null,"status":200,"ts":{ts},"userAgent":null,"userId":"15"}}"#
    )
}

fn count(db: &dyn Database, table: &str) -> i64 {
    db.fetch_one(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .unwrap()
        .unwrap()
        .get_i64(0)
        .unwrap()
        .unwrap()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_resolved_play() {
    let fx = Fixture::new();
    fx.song("A/A/A/TRAAAAW128F429D538.json", "SOSZ123", "Test Song", "ARXYZ1", "Casual", 210.5);
    fx.log(
        "2018/11/2018-11-01-events.json",
        &[play(1_541_106_106_796, "8", "free", "Test Song", "Casual", 210.5)],
    );

    let db = reset_schema(":memory:").unwrap();
    let summary = fx.load(db.as_ref());

    assert_eq!(summary.songs.files, 1);
    assert_eq!(summary.logs.files, 1);
    assert_eq!(count(db.as_ref(), "songs"), 1);
    assert_eq!(count(db.as_ref(), "artists"), 1);
    assert_eq!(count(db.as_ref(), "songplays"), 1);

    let artist = db
        .fetch_one("SELECT name FROM artists WHERE artist_id = 'ARXYZ1'", &[])
        .unwrap()
        .unwrap();
    assert_eq!(artist.get_str(0).unwrap(), Some("Casual"));

    let fact = db
        .fetch_one("SELECT song_id, artist_id, user_id FROM songplays", &[])
        .unwrap()
        .unwrap();
    assert_eq!(fact.get_str(0).unwrap(), Some("SOSZ123"));
    assert_eq!(fact.get_str(1).unwrap(), Some("ARXYZ1"));
    assert_eq!(fact.get_i64(2).unwrap(), Some(8));
}

#[test]
fn test_time_rows_match_their_timestamp() {
    let fx = Fixture::new();
    fx.song("a.json", "S1", "One", "AR1", "Band", 100.0);
    fx.log(
        "events.json",
        &[
            play(1_541_106_106_796, "8", "free", "One", "Band", 100.0),
            play(1_543_622_400_000, "9", "free", "One", "Band", 100.0),
            play(1_541_289_599_999, "10", "paid", "One", "Band", 100.0),
        ],
    );

    let db = reset_schema(":memory:").unwrap();
    fx.load(db.as_ref());

    let rows = db
        .fetch_all(
            "SELECT start_time, hour, day, week, month, year, weekday FROM \"time\" ORDER BY start_time",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);

    for row in rows {
        let ts = row.get_timestamp(0).unwrap().unwrap();
        assert_eq!(row.get_i64(1).unwrap(), Some(i64::from(ts.hour())));
        assert_eq!(row.get_i64(2).unwrap(), Some(i64::from(ts.day())));
        assert_eq!(row.get_i64(3).unwrap(), Some(i64::from(ts.iso_week().week())));
        assert_eq!(row.get_i64(4).unwrap(), Some(i64::from(ts.month())));
        assert_eq!(row.get_i64(5).unwrap(), Some(i64::from(ts.year())));
        assert_eq!(
            row.get_i64(6).unwrap(),
            Some(i64::from(ts.weekday().num_days_from_monday()))
        );
    }
}

#[test]
fn test_reloading_logs_duplicates_only_songplays() {
    let fx = Fixture::new();
    fx.song("a.json", "S1", "One", "AR1", "Band", 100.0);
    fx.log(
        "events.json",
        &[
            play(1_541_106_106_796, "8", "free", "One", "Band", 100.0),
            page(1_541_106_200_000, "Home"),
            play(1_541_106_306_796, "15", "paid", "Unknown", "Nobody", 5.0),
        ],
    );

    let db = reset_schema(":memory:").unwrap();
    fx.load(db.as_ref());
    let second = fx.load(db.as_ref());

    assert_eq!(second.songs.stats.songs, 0);
    assert_eq!(second.logs.stats.time_rows, 0);
    assert_eq!(count(db.as_ref(), "songs"), 1);
    assert_eq!(count(db.as_ref(), "users"), 2);
    assert_eq!(count(db.as_ref(), "\"time\""), 2);
    assert_eq!(count(db.as_ref(), "songplays"), 4);

    let unresolved = count(db.as_ref(), "songplays WHERE song_id IS NULL AND artist_id IS NULL");
    assert_eq!(unresolved, 2);
}

#[test]
fn test_user_level_upgrade_across_files() {
    let fx = Fixture::new();
    fx.song("a.json", "S1", "One", "AR1", "Band", 100.0);
    fx.log(
        "2018-11-01-events.json",
        &[play(1_541_106_106_796, "15", "free", "One", "Band", 100.0)],
    );
    fx.log(
        "2018-11-02-events.json",
        &[play(1_541_192_506_796, "15", "paid", "One", "Band", 100.0)],
    );

    let db = reset_schema(":memory:").unwrap();
    fx.load(db.as_ref());

    let user = db
        .fetch_one("SELECT level, first_name FROM users WHERE user_id = 15", &[])
        .unwrap()
        .unwrap();
    assert_eq!(user.get_str(0).unwrap(), Some("paid"));
    assert_eq!(user.get_str(1).unwrap(), Some("Lily"));
}

#[test]
fn test_log_without_plays_inserts_nothing() {
    let fx = Fixture::new();
    fx.log(
        "quiet.json",
        &[page(1_541_106_106_796, "Home"), page(1_541_106_206_796, "Logout")],
    );
    fs::create_dir_all(fx.song_root()).unwrap();

    let db = reset_schema(":memory:").unwrap();
    let summary = fx.load(db.as_ref());

    assert_eq!(summary.songs.files, 0);
    assert_eq!(summary.logs.stats.records, 2);
    for table in ["users", "\"time\"", "songplays"] {
        assert_eq!(count(db.as_ref(), table), 0, "{table}");
    }
}

#[test]
fn test_malformed_song_file_halts_batch() {
    let fx = Fixture::new();
    fx.song("A/1.json", "S1", "One", "AR1", "Band", 100.0);
    fx.write(&fx.song_root().join("B/2.json"), "");
    fx.song("C/3.json", "S3", "Three", "AR3", "Other", 300.0);

    let db = reset_schema(":memory:").unwrap();
    let err = process_data(
        db.as_ref(),
        &fx.song_root(),
        "json",
        DataSet::Songs.transformer(),
        &LogProgress,
    )
    .unwrap_err();

    match err {
        EtlError::MalformedRecord { path, line, .. } => {
            assert!(path.ends_with("2.json"), "{path}");
            assert_eq!(line, None);
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }

    let ids = db.fetch_all("SELECT song_id FROM songs", &[]).unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].get_str(0).unwrap(), Some("S1"));
}

#[test]
fn test_file_database_survives_reconnect() {
    let fx = Fixture::new();
    fx.song("a.json", "SOSZ123", "Test Song", "ARXYZ1", "Casual", 210.5);
    fx.log("events.json", &[play(1_541_106_106_796, "8", "free", "Test Song", "Casual", 210.5)]);
    let dsn = fx.dir.path().join("sparkify.duckdb").display().to_string();

    {
        let db = reset_schema(&dsn).unwrap();
        fx.load(db.as_ref());
    }

    let db = sk_db::connect(&dsn).unwrap();
    assert_eq!(count(db.as_ref(), "songplays"), 1);
    assert!(sk_etl::missing_tables(db.as_ref()).unwrap().is_empty());
}
