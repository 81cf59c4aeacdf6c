//! File Walker and Batch Driver.
//!
//! Every file is its own unit of work: begin, transform, commit. The first
//! failure rolls back that file and halts the batch, leaving earlier files
//! committed.

use crate::error::{EtlError, EtlResult};
use crate::transform::{process_log_file, process_song_file, FileStats};
use sk_db::Database;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::{DirEntry, WalkDir};

pub use sk_core::DEFAULT_EXTENSION;

/// Signature shared by the record transformers
pub type Transformer = fn(&dyn Database, &Path) -> EtlResult<FileStats>;

/// The two source data sets, loaded songs first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSet {
    Songs,
    Logs,
}

impl DataSet {
    pub fn transformer(self) -> Transformer {
        match self {
            DataSet::Songs => process_song_file,
            DataSet::Logs => process_log_file,
        }
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSet::Songs => write!(f, "song data"),
            DataSet::Logs => write!(f, "log data"),
        }
    }
}

/// Observer for batch progress.
///
/// Only `file_done` is required; the CLI drives a progress bar from it.
pub trait LoadProgress {
    fn started(&self, _root: &Path, _total: usize) {}

    fn file_done(&self, path: &Path, processed: usize, total: usize);

    fn finished(&self, _summary: &BatchSummary) {}
}

/// Reports progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl LoadProgress for LogProgress {
    fn started(&self, root: &Path, total: usize) {
        log::info!("{total} files found in {}", root.display());
    }

    fn file_done(&self, path: &Path, processed: usize, total: usize) {
        log::info!("{processed}/{total} files processed ({})", path.display());
    }
}

/// Outcome of one completed batch
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub root: PathBuf,
    /// Files committed
    pub files: usize,
    pub stats: FileStats,
    pub elapsed: Duration,
}

/// Summaries of a full load, songs first
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub songs: BatchSummary,
    pub logs: BatchSummary,
}

/// Dot-prefixed entries below the root. A hidden directory prunes its
/// whole subtree, so files nested under e.g. `.ipynb_checkpoints/` are
/// never loaded even though a plain recursive listing would return them.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Recursively find files under `root` with `extension`, sorted by path.
///
/// Hidden files are skipped, and hidden directories are not descended into.
/// The root itself is walked even when its own name starts with a dot. A
/// missing root is an error.
pub fn discover_files(root: &Path, extension: &str) -> EtlResult<Vec<PathBuf>> {
    if !root.is_dir() {
        let kind = if root.exists() {
            std::io::ErrorKind::InvalidInput
        } else {
            std::io::ErrorKind::NotFound
        };
        return Err(EtlError::io(
            root,
            std::io::Error::new(kind, "not a data directory"),
        ));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            EtlError::io(&path, e.into())
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Transform one file inside its own unit of work.
///
/// A failed transform or commit rolls the file back before the error is
/// returned.
fn commit_file(db: &dyn Database, path: &Path, transformer: Transformer) -> EtlResult<FileStats> {
    db.begin().map_err(EtlError::load(path))?;

    let outcome = transformer(db, path).and_then(|stats| {
        db.commit().map_err(EtlError::load(path))?;
        Ok(stats)
    });

    if outcome.is_err() {
        if let Err(e) = db.rollback() {
            log::warn!("Rollback of {} failed: {e}", path.display());
        }
        log::debug!("Rolled back {}", path.display());
    }
    outcome
}

/// Run `transformer` over every file under `root`, committing per file.
pub fn process_data(
    db: &dyn Database,
    root: &Path,
    extension: &str,
    transformer: Transformer,
    progress: &dyn LoadProgress,
) -> EtlResult<BatchSummary> {
    let start = Instant::now();
    let files = discover_files(root, extension)?;
    let total = files.len();
    progress.started(root, total);

    let mut stats = FileStats::default();
    for (idx, path) in files.iter().enumerate() {
        stats += commit_file(db, path, transformer)?;
        progress.file_done(path, idx + 1, total);
    }

    let summary = BatchSummary {
        root: root.to_path_buf(),
        files: total,
        stats,
        elapsed: start.elapsed(),
    };
    progress.finished(&summary);
    Ok(summary)
}

/// Load a whole data set with its transformer.
pub fn load_data_set(
    db: &dyn Database,
    data_set: DataSet,
    root: &Path,
    extension: &str,
    progress: &dyn LoadProgress,
) -> EtlResult<BatchSummary> {
    log::info!("Loading {data_set} from {}", root.display());
    process_data(db, root, extension, data_set.transformer(), progress)
}

/// Load song data, then log data.
pub fn load_all(
    db: &dyn Database,
    song_root: &Path,
    log_root: &Path,
    extension: &str,
    progress: &dyn LoadProgress,
) -> EtlResult<LoadSummary> {
    let songs = load_data_set(db, DataSet::Songs, song_root, extension, progress)?;
    let logs = load_data_set(db, DataSet::Logs, log_root, extension, progress)?;
    Ok(LoadSummary { songs, logs })
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
