//! Verification execution

use crate::check::{Check, CHECKS, DEFAULT_PROBE_ARTIST};
use crate::error::{VerifyError, VerifyResult};
use sk_db::Database;
use std::time::{Duration, Instant};

/// Result of a single check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Check name
    pub name: String,

    /// Table covered
    pub table: String,

    /// Whether the query returned at least one row
    pub passed: bool,

    /// First returned row, formatted for display
    pub first_row: Option<String>,

    /// Execution time
    pub duration: Duration,

    /// Error message if the query failed
    pub error: Option<String>,
}

impl CheckResult {
    /// Create a passed check result
    pub fn pass(check: &Check, first_row: String, duration: Duration) -> Self {
        Self {
            name: check.name.to_string(),
            table: check.table.to_string(),
            passed: true,
            first_row: Some(first_row),
            duration,
            error: None,
        }
    }

    /// Create a failed check result (no rows)
    pub fn fail(check: &Check, duration: Duration) -> Self {
        Self {
            name: check.name.to_string(),
            table: check.table.to_string(),
            passed: false,
            first_row: None,
            duration,
            error: None,
        }
    }

    /// Create an error check result
    pub fn error(check: &Check, error: String, duration: Duration) -> Self {
        Self {
            name: check.name.to_string(),
            table: check.table.to_string(),
            passed: false,
            first_row: None,
            duration,
            error: Some(error),
        }
    }
}

/// Outcome of a verification run
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub results: Vec<CheckResult>,

    /// Total execution time
    pub duration: Duration,
}

impl VerifyReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn errors(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    /// Check if every check returned a row
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Failing tables, each named once, in check order
    pub fn failures(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for result in self.results.iter().filter(|r| !r.passed) {
            if !tables.contains(&result.table) {
                tables.push(result.table.clone());
            }
        }
        tables
    }

    /// Convert a report with failures into [`VerifyError::VerificationFailure`].
    pub fn into_result(self) -> VerifyResult<Self> {
        if self.all_passed() {
            Ok(self)
        } else {
            Err(VerifyError::VerificationFailure {
                tables: self.failures(),
            })
        }
    }
}

/// Runs the fixed checks against one connection
pub struct Verifier<'a> {
    db: &'a dyn Database,
    probe_artist: String,
}

impl<'a> Verifier<'a> {
    /// Create a verifier probing for `probe_artist`
    pub fn new(db: &'a dyn Database, probe_artist: impl Into<String>) -> Self {
        Self {
            db,
            probe_artist: probe_artist.into(),
        }
    }

    /// Create a verifier probing for the default artist
    pub fn with_default_probe(db: &'a dyn Database) -> Self {
        Self::new(db, DEFAULT_PROBE_ARTIST)
    }

    pub fn probe_artist(&self) -> &str {
        &self.probe_artist
    }

    /// Run a single check
    pub fn run_check(&self, check: &Check) -> CheckResult {
        let start = Instant::now();

        match check.first_row(self.db, &self.probe_artist) {
            Ok(Some(row)) => CheckResult::pass(check, row.to_string(), start.elapsed()),
            Ok(None) => {
                log::debug!("Check {} returned no rows", check.name);
                CheckResult::fail(check, start.elapsed())
            }
            Err(e) => {
                log::debug!("Check {} failed: {e}", check.name);
                CheckResult::error(check, e.to_string(), start.elapsed())
            }
        }
    }

    /// Run every check and collect the report
    pub fn run(&self) -> VerifyReport {
        let start = Instant::now();
        let results = CHECKS.iter().map(|check| self.run_check(check)).collect();

        let report = VerifyReport {
            results,
            duration: start.elapsed(),
        };
        log::info!(
            "Verification: {}/{} checks passed",
            report.passed(),
            report.results.len()
        );
        report
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
