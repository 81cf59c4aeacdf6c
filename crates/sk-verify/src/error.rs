//! Error types for sk-verify

use thiserror::Error;

/// Verification errors
#[derive(Error, Debug)]
pub enum VerifyError {
    /// One or more tables returned no rows or could not be queried
    #[error("[V001] Verification failed for tables: {}", tables.join(", "))]
    VerificationFailure { tables: Vec<String> },
}

/// Result type alias for VerifyError
pub type VerifyResult<T> = Result<T, VerifyError>;
