//! Regeneration Orchestrator.
//!
//! Runs reset, song load, log load and verification in sequence, one
//! component call per stage. The first failure halts the run and names the
//! stage it happened in; nothing is rolled back.

use crate::batch::{load_data_set, BatchSummary, DataSet, LoadProgress, DEFAULT_EXTENSION};
use crate::error::EtlError;
use crate::schema::reset_schema;
use sk_db::Database;
use sk_verify::{Verifier, VerifyError, VerifyReport, DEFAULT_PROBE_ARTIST};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Position in the regeneration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    SchemaReset,
    SongsLoaded,
    LogsLoaded,
    Verified,
}

impl Stage {
    /// The stage reached after this one completes successfully
    pub fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::SchemaReset,
            Stage::SchemaReset => Stage::SongsLoaded,
            Stage::SongsLoaded => Stage::LogsLoaded,
            Stage::LogsLoaded => Stage::Verified,
            Stage::Verified => Stage::Idle,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::SchemaReset => "schema reset",
            Stage::SongsLoaded => "song load",
            Stage::LogsLoaded => "log load",
            Stage::Verified => "verification",
        };
        write!(f, "{name}")
    }
}

/// Error raised by the stage that failed
#[derive(Error, Debug)]
pub enum StageFailure {
    #[error(transparent)]
    Etl(#[from] EtlError),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

/// A regeneration run halted at `stage`
#[derive(Error, Debug)]
#[error("Regeneration failed during {stage}: {source}")]
pub struct RegenerationError {
    /// The stage that was being entered when the failure occurred
    pub stage: Stage,
    #[source]
    pub source: StageFailure,
}

/// Inputs of a regeneration run
#[derive(Debug, Clone)]
pub struct RegenerationOptions {
    pub dsn: String,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub extension: String,
    pub probe_artist: String,
}

impl RegenerationOptions {
    pub fn new(dsn: impl Into<String>, song_root: PathBuf, log_root: PathBuf) -> Self {
        Self {
            dsn: dsn.into(),
            song_root,
            log_root,
            extension: DEFAULT_EXTENSION.to_string(),
            probe_artist: DEFAULT_PROBE_ARTIST.to_string(),
        }
    }
}

/// Everything a successful run produced
#[derive(Debug)]
pub struct RegenerationReport {
    pub songs: BatchSummary,
    pub logs: BatchSummary,
    pub verification: VerifyReport,
    /// Stages passed through, in order, ending back at `Idle`
    pub stages: Vec<Stage>,
}

struct Run {
    stage: Stage,
    completed: Vec<Stage>,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: Stage::Idle,
            completed: Vec::new(),
        }
    }

    /// Perform the transition out of the current stage.
    fn advance<T, E>(&mut self, step: impl FnOnce() -> Result<T, E>) -> Result<T, RegenerationError>
    where
        E: Into<StageFailure>,
    {
        let target = self.stage.next();
        log::info!("Regeneration: starting {target}");

        let value = step().map_err(|e| RegenerationError {
            stage: target,
            source: e.into(),
        })?;

        self.stage = target;
        self.completed.push(target);
        Ok(value)
    }

    /// Return to `Idle` once verification has passed.
    fn finish(mut self) -> Vec<Stage> {
        self.stage = self.stage.next();
        self.completed.push(self.stage);
        self.completed
    }
}

/// Drop and rebuild the schema, load both data sets, then verify.
///
/// Returns the connection used for the run along with the report, so an
/// in-memory database remains inspectable.
pub fn regenerate(
    options: &RegenerationOptions,
    progress: &dyn LoadProgress,
) -> Result<(Box<dyn Database>, RegenerationReport), RegenerationError> {
    let mut run = Run::new();

    let db = run.advance(|| reset_schema(&options.dsn))?;
    let songs = run.advance(|| {
        load_data_set(
            db.as_ref(),
            DataSet::Songs,
            &options.song_root,
            &options.extension,
            progress,
        )
    })?;
    let logs = run.advance(|| {
        load_data_set(
            db.as_ref(),
            DataSet::Logs,
            &options.log_root,
            &options.extension,
            progress,
        )
    })?;
    let verification = run.advance(|| {
        Verifier::new(db.as_ref(), options.probe_artist.as_str())
            .run()
            .into_result()
    })?;

    log::info!("Regeneration complete");

    let report = RegenerationReport {
        songs,
        logs,
        verification,
        stages: run.finish(),
    };
    Ok((db, report))
}

#[cfg(test)]
#[path = "regenerate_test.rs"]
mod tests;
