//! sk-verify - Verification harness for Sparkify
//!
//! This crate runs one read query per schema table and reports which tables
//! came back empty or failed. It never modifies the database.

pub mod check;
pub mod error;
pub mod runner;

pub use check::{Check, CHECKS, DEFAULT_PROBE_ARTIST};
pub use error::{VerifyError, VerifyResult};
pub use runner::{CheckResult, Verifier, VerifyReport};
