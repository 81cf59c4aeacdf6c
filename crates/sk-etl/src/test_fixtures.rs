//! Shared fixtures for unit tests: song documents and log lines.

use std::fs;
use std::path::{Path, PathBuf};

/// Song document for the canonical "Test Song" by "Casual".
pub(crate) const TEST_SONG_JSON: &str = r#"{"song_id":"SOSZ123","title":"Test Song","artist_id":"ARXYZ1","artist_name":"Casual","artist_location":"","artist_latitude":null,"artist_longitude":null,"duration":210.5,"year":2000}"#;

pub(crate) fn song_json(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist: &str,
    duration: f64,
) -> String {
    format!(
        r#"{{"num_songs":1,"song_id":"{song_id}","title":"{title}","artist_id":"{artist_id}","artist_name":"{artist}","artist_location":"Somewhere","artist_latitude":35.14968,"artist_longitude":-90.04892,"duration":{duration},"year":1998}}"#
    )
}

pub(crate) fn next_song_line(
    ts: i64,
    user_id: i64,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> String {
    format!(
        r#"{{"artist":"{artist}","auth":"Logged In","firstName":"Kaylee","gender":"F","itemInSession":0,"lastName":"Summers","length":{length},"level":"{level}","location":"Phoenix-Mesa-Scottsdale, AZ","method":"PUT","page":"NextSong","registration":1540344794796.0,"sessionId":139,"song":"{song}","status":200,"ts":{ts},"userAgent":"Mozilla/5.0 (Windows NT 6.1; WOW64)","userId":"{user_id}"}}"#
    )
}

pub(crate) fn home_line(ts: i64) -> String {
    format!(
        r#"{{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":0,"lastName":null,"length":null,"level":"free","location":null,"method":"GET","page":"Home","registration":null,"sessionId":52,"song":null,"status":200,"ts":{ts},"userAgent":null,"userId":""}}"#
    )
}

pub(crate) fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
