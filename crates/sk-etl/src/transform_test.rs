use super::*;
use crate::schema::create_tables;
use crate::test_fixtures::{home_line, next_song_line, song_json, write_file, TEST_SONG_JSON};
use sk_db::DuckDbBackend;
use tempfile::tempdir;

fn schema_db() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    create_tables(&db).unwrap();
    db
}

fn count(db: &dyn Database, table: &str) -> i64 {
    db.fetch_one(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .unwrap()
        .unwrap()
        .get_i64(0)
        .unwrap()
        .unwrap()
}

#[test]
fn test_song_file_inserts_song_and_artist() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "A/A/A/TRAAAAW128F429D538.json", TEST_SONG_JSON);
    let db = schema_db();

    let stats = process_song_file(&db, &path).unwrap();
    assert_eq!(stats.songs, 1);
    assert_eq!(stats.artists, 1);

    let song = db
        .fetch_one(
            "SELECT song_id, title, artist_id, year, duration FROM songs",
            &[],
        )
        .unwrap()
        .unwrap();
    assert_eq!(song.get_str(0).unwrap(), Some("SOSZ123"));
    assert_eq!(song.get_str(1).unwrap(), Some("Test Song"));
    assert_eq!(song.get_str(2).unwrap(), Some("ARXYZ1"));
    assert_eq!(song.get_i64(3).unwrap(), Some(2000));
    assert_eq!(song.get_f64(4).unwrap(), Some(210.5));

    let artist = db
        .fetch_one(
            "SELECT artist_id, name, location, latitude, longitude FROM artists",
            &[],
        )
        .unwrap()
        .unwrap();
    assert_eq!(artist.get_str(1).unwrap(), Some("Casual"));
    assert_eq!(artist.get_str(2).unwrap(), Some(""));
    assert!(artist.get(3).is_null());
}

#[test]
fn test_song_file_duplicate_artist_is_ignored() {
    let dir = tempdir().unwrap();
    let first = write_file(dir.path(), "a.json", &song_json("S1", "One", "AR1", "Band", 100.0));
    let second = write_file(dir.path(), "b.json", &song_json("S2", "Two", "AR1", "Band", 200.0));
    let db = schema_db();

    process_song_file(&db, &first).unwrap();
    let stats = process_song_file(&db, &second).unwrap();

    assert_eq!(stats.songs, 1);
    assert_eq!(stats.artists, 0);
    assert_eq!(count(&db, "songs"), 2);
    assert_eq!(count(&db, "artists"), 1);
}

#[test]
fn test_song_file_reloaded_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "a.json", TEST_SONG_JSON);
    let db = schema_db();

    process_song_file(&db, &path).unwrap();
    let stats = process_song_file(&db, &path).unwrap();
    assert_eq!(stats.songs, 0);
    assert_eq!(count(&db, "songs"), 1);
}

#[test]
fn test_song_file_empty_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "empty.json", "  \n");
    let err = process_song_file(&schema_db(), &path).unwrap_err();
    assert!(matches!(err, EtlError::MalformedRecord { .. }), "got {err:?}");
    assert!(err.to_string().contains("no song record"));
}

#[test]
fn test_song_file_with_two_records_is_malformed() {
    let dir = tempdir().unwrap();
    let content = format!("{TEST_SONG_JSON}\n{TEST_SONG_JSON}\n");
    let path = write_file(dir.path(), "two.json", &content);
    let err = process_song_file(&schema_db(), &path).unwrap_err();
    assert!(err.to_string().contains("found 2"));
}

#[test]
fn test_song_file_missing_field_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "partial.json",
        r#"{"song_id":"S1","title":"T","artist_id":"A1","duration":1.0,"year":1}"#,
    );
    let db = schema_db();
    let err = process_song_file(&db, &path).unwrap_err();
    match err {
        EtlError::MalformedRecord { path: p, reason, .. } => {
            assert!(p.ends_with("partial.json"));
            assert!(reason.contains("artist_name"));
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
    assert_eq!(count(&db, "songs"), 0);
}

#[test]
fn test_song_file_invalid_json_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "bad.json", "{\"song_id\": ");
    let err = process_song_file(&schema_db(), &path).unwrap_err();
    assert!(matches!(err, EtlError::MalformedRecord { .. }));
}

#[test]
fn test_song_file_missing_is_io_error() {
    let dir = tempdir().unwrap();
    let err = process_song_file(&schema_db(), &dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, EtlError::Io { .. }));
}

#[test]
fn test_log_file_loads_next_song_events_only() {
    let dir = tempdir().unwrap();
    let content = [
        home_line(1_541_105_830_796),
        next_song_line(1_541_106_106_796, 8, "free", "Test Song", "Casual", 210.5),
        home_line(1_541_106_352_796),
        next_song_line(1_541_106_496_796, 8, "free", "Other", "Someone", 99.0),
    ]
    .join("\n");
    let path = write_file(dir.path(), "2018-11-01-events.json", &content);
    let db = schema_db();
    process_song_file(&db, &write_file(dir.path(), "song.json", TEST_SONG_JSON)).unwrap();

    let stats = process_log_file(&db, &path).unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.time_rows, 2);
    assert_eq!(stats.songplays, 2);
    assert_eq!(stats.unresolved, 1);

    assert_eq!(count(&db, "\"time\""), 2);
    assert_eq!(count(&db, "users"), 1);
    assert_eq!(count(&db, "songplays"), 2);

    let resolved = db
        .fetch_one(
            "SELECT song_id, artist_id, session_id, level FROM songplays WHERE song_id IS NOT NULL",
            &[],
        )
        .unwrap()
        .unwrap();
    assert_eq!(resolved.get_str(0).unwrap(), Some("SOSZ123"));
    assert_eq!(resolved.get_str(1).unwrap(), Some("ARXYZ1"));
    assert_eq!(resolved.get_i64(2).unwrap(), Some(139));
    assert_eq!(resolved.get_str(3).unwrap(), Some("free"));
}

#[test]
fn test_log_file_without_next_song_inserts_nothing() {
    let dir = tempdir().unwrap();
    let content = format!("{}\n{}\n", home_line(1), home_line(2));
    let path = write_file(dir.path(), "quiet.json", &content);
    let db = schema_db();

    let stats = process_log_file(&db, &path).unwrap();
    assert_eq!(stats.records, 2);
    assert_eq!(stats.time_rows + stats.users + stats.songplays, 0);
    assert_eq!(count(&db, "\"time\""), 0);
    assert_eq!(count(&db, "users"), 0);
    assert_eq!(count(&db, "songplays"), 0);
}

#[test]
fn test_log_file_empty_is_not_an_error() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "empty.json", "");
    let stats = process_log_file(&schema_db(), &path).unwrap();
    assert_eq!(stats, FileStats::default());
}

#[test]
fn test_user_level_last_write_wins() {
    let dir = tempdir().unwrap();
    let content = [
        next_song_line(1_541_106_106_796, 15, "free", "A", "B", 1.0),
        next_song_line(1_541_106_206_796, 15, "paid", "A", "B", 1.0),
    ]
    .join("\n");
    let path = write_file(dir.path(), "upgrade.json", &content);
    let db = schema_db();

    process_log_file(&db, &path).unwrap();

    let row = db
        .fetch_one("SELECT level FROM users WHERE user_id = ?", &[15i64.into()])
        .unwrap()
        .unwrap();
    assert_eq!(row.get_str(0).unwrap(), Some("paid"));
    assert_eq!(count(&db, "users"), 1);

    let levels = db
        .fetch_all("SELECT level FROM songplays ORDER BY start_time", &[])
        .unwrap();
    assert_eq!(levels[0].get_str(0).unwrap(), Some("free"));
    assert_eq!(levels[1].get_str(0).unwrap(), Some("paid"));
}

#[test]
fn test_duplicate_timestamps_share_one_time_row() {
    let dir = tempdir().unwrap();
    let line = next_song_line(1_541_106_106_796, 8, "free", "A", "B", 1.0);
    let path = write_file(dir.path(), "dup.json", &format!("{line}\n{line}\n"));
    let db = schema_db();

    let stats = process_log_file(&db, &path).unwrap();
    assert_eq!(stats.time_rows, 1);
    assert_eq!(stats.songplays, 2);
    assert_eq!(count(&db, "\"time\""), 1);
}

#[test]
fn test_log_file_bad_line_reports_line_number() {
    let dir = tempdir().unwrap();
    let content = format!(
        "{}\nnot json\n",
        next_song_line(1_541_106_106_796, 8, "free", "A", "B", 1.0)
    );
    let path = write_file(dir.path(), "broken.json", &content);
    let db = schema_db();

    let err = process_log_file(&db, &path).unwrap_err();
    match &err {
        EtlError::MalformedRecord { line, .. } => assert_eq!(*line, Some(2)),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
    assert!(err.to_string().contains("(line 2)"));
    assert_eq!(count(&db, "songplays"), 0);
}

#[test]
fn test_log_file_next_song_without_user_is_malformed() {
    let dir = tempdir().unwrap();
    let line = next_song_line(1_541_106_106_796, 8, "free", "A", "B", 1.0)
        .replace(r#""userId":"8""#, r#""userId":"""#);
    let path = write_file(dir.path(), "anon.json", &line);

    let err = process_log_file(&schema_db(), &path).unwrap_err();
    assert!(err.to_string().contains("userId"));
}

#[test]
fn test_file_stats_add_assign() {
    let mut total = FileStats {
        records: 1,
        songs: 1,
        ..FileStats::default()
    };
    total += FileStats {
        records: 2,
        songplays: 2,
        unresolved: 1,
        ..FileStats::default()
    };
    assert_eq!(total.records, 3);
    assert_eq!(total.songs, 1);
    assert_eq!(total.songplays, 2);
    assert_eq!(total.unresolved, 1);
}
