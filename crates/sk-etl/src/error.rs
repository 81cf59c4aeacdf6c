//! Error types for sk-etl

use sk_db::DbError;
use std::path::Path;
use thiserror::Error;

/// ETL errors. Every variant is fatal for the operation that raised it.
#[derive(Error, Debug)]
pub enum EtlError {
    /// DDL or connection failure while resetting the schema (L001)
    #[error("[L001] Schema operation failed ({step}): {source}")]
    SchemaError {
        step: &'static str,
        #[source]
        source: DbError,
    },

    /// A file's content cannot be turned into rows (L002)
    #[error("[L002] Malformed record in {path}{}: {reason}", line_suffix(.line))]
    MalformedRecord {
        path: String,
        line: Option<usize>,
        reason: String,
    },

    /// The database connection failed mid-batch (L003)
    #[error("[L003] Connection lost while loading {path}: {source}")]
    ConnectionLost {
        path: String,
        #[source]
        source: DbError,
    },

    /// A statement failed while loading a file (L004)
    #[error("[L004] Failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: DbError,
    },

    /// Reading an input file or directory failed (L005)
    #[error("[L005] Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for EtlError
pub type EtlResult<T> = Result<T, EtlError>;

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" (line {n})")).unwrap_or_default()
}

impl EtlError {
    pub(crate) fn schema(step: &'static str) -> impl FnOnce(DbError) -> EtlError {
        move |source| EtlError::SchemaError { step, source }
    }

    /// Classify a database error raised while loading `path`.
    pub(crate) fn load(path: &Path) -> impl FnOnce(DbError) -> EtlError + '_ {
        move |source| {
            let path = path.display().to_string();
            if source.is_connection_error() {
                EtlError::ConnectionLost { path, source }
            } else {
                EtlError::Load { path, source }
            }
        }
    }

    pub(crate) fn malformed(path: &Path, line: Option<usize>, reason: impl ToString) -> Self {
        EtlError::MalformedRecord {
            path: path.display().to_string(),
            line,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
