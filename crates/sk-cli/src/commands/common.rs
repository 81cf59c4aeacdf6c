//! Shared utilities for CLI commands

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use sk_core::{Config, MEMORY_DB_PATH};
use sk_db::{connect, Database};
use sk_etl::{BatchSummary, LoadProgress};
use sk_verify::VerifyReport;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Verification found empty or missing tables
pub(crate) const EXIT_VERIFY_FAILED: i32 = 1;
/// Missing `--yes` or an unusable config
pub(crate) const EXIT_USAGE: i32 = 2;
/// A data file could not be loaded
pub(crate) const EXIT_LOAD_FAILED: i32 = 3;
/// The database or schema is unusable
pub(crate) const EXIT_DATABASE: i32 = 4;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run and the connection is closed.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl ExitCode {
    pub(crate) fn status(&self) -> u8 {
        u8::try_from(self.0).unwrap_or(1)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the message was already printed.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Print `err` and turn it into an exit with `code`.
pub(crate) fn fail(code: i32, err: impl fmt::Display) -> anyhow::Error {
    eprintln!("Error: {err}");
    ExitCode(code).into()
}

/// Project directory and its resolved configuration
#[derive(Debug)]
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    database_override: Option<String>,
}

impl ProjectContext {
    /// Database DSN: `--database` wins over `database.path`.
    pub(crate) fn dsn(&self) -> String {
        match &self.database_override {
            Some(dsn) => dsn.clone(),
            None => self.config.database_path_absolute(&self.root),
        }
    }

    pub(crate) fn song_root(&self, override_path: Option<&str>) -> PathBuf {
        override_path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.song_data_absolute(&self.root))
    }

    pub(crate) fn log_root(&self, override_path: Option<&str>) -> PathBuf {
        override_path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.log_data_absolute(&self.root))
    }
}

/// Load the project configuration named by the global flags.
///
/// An explicit `--config` must exist; otherwise a missing `sparkify.yml`
/// falls back to defaults.
pub(crate) fn load_context(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);
    let loaded = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_or_default(&root),
    };
    let config = loaded.map_err(|e| fail(EXIT_USAGE, e))?;

    log::debug!("Loaded project '{}' from {}", config.name, root.display());
    Ok(ProjectContext {
        root,
        config,
        database_override: global.database.clone(),
    })
}

/// Refuse destructive commands that were not confirmed with `--yes`.
pub(crate) fn require_confirmation(yes: bool, action: &str) -> Result<()> {
    if yes {
        return Ok(());
    }
    eprintln!("Refusing to {action} without --yes.");
    Err(ExitCode(EXIT_USAGE).into())
}

pub(crate) fn open_database(dsn: &str) -> Result<Box<dyn Database>> {
    connect(dsn).map_err(|e| fail(EXIT_DATABASE, e))
}

/// Open a database that a previous `reset-schema` created.
///
/// Connecting to a missing file would create it, so a missing path is
/// reported instead.
pub(crate) fn open_existing_database(dsn: &str) -> Result<Box<dyn Database>> {
    if dsn != MEMORY_DB_PATH && !Path::new(dsn).exists() {
        return Err(fail(
            EXIT_DATABASE,
            format!("Database {dsn} does not exist. Run `sparkify reset-schema --yes` first."),
        ));
    }
    open_database(dsn)
}

/// Drives one progress bar per batch.
pub(crate) struct BarProgress {
    bar: RefCell<Option<ProgressBar>>,
}

impl BarProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }
}

impl LoadProgress for BarProgress {
    fn started(&self, root: &Path, total: usize) {
        println!("{total} files found in {}", root.display());
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        *self.bar.borrow_mut() = Some(pb);
    }

    fn file_done(&self, path: &Path, processed: usize, _total: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position(processed as u64);
            if let Some(name) = path.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
        }
    }

    fn finished(&self, _summary: &BatchSummary) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        // A halted batch never reaches `finished`.
        if let Some(pb) = self.bar.get_mut().take() {
            pb.abandon();
        }
    }
}

pub(crate) fn print_batch(label: &str, summary: &BatchSummary) {
    let stats = &summary.stats;
    println!(
        "  {label}: {} files, {} records [{}ms]",
        summary.files,
        stats.records,
        summary.elapsed.as_millis()
    );
    if stats.songs + stats.artists > 0 {
        println!("    songs: {}, artists: {}", stats.songs, stats.artists);
    }
    if stats.songplays > 0 || stats.time_rows > 0 {
        println!(
            "    time: {}, users: {}, songplays: {} ({} unresolved)",
            stats.time_rows, stats.users, stats.songplays, stats.unresolved
        );
    }
}

pub(crate) fn print_verify_report(report: &VerifyReport) {
    for result in &report.results {
        if result.passed {
            println!("  ✓ {} [{}ms]", result.name, result.duration.as_millis());
            if let Some(row) = &result.first_row {
                println!("    {row}");
            }
        } else if let Some(error) = &result.error {
            println!(
                "  ✗ {} - {} [{}ms]",
                result.name,
                error,
                result.duration.as_millis()
            );
        } else {
            println!(
                "  ✗ {} (no rows) [{}ms]",
                result.name,
                result.duration.as_millis()
            );
        }
    }

    println!();
    println!(
        "Passed: {}, Failed: {}",
        report.passed(),
        report.results.len() - report.passed()
    );
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
