//! Typed query contract.
//!
//! A [`Query<N>`] carries SQL with exactly `N` positional `?` placeholders and
//! only accepts `[SqlValue; N]`. The arity is checked when the query is
//! constructed, so a `const` query with the wrong count fails to compile.

use crate::error::DbResult;
use crate::traits::Database;
use crate::value::{Row, SqlValue};

/// SQL statement with a fixed number of positional parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query<const N: usize> {
    sql: &'static str,
}

impl<const N: usize> Query<N> {
    /// Create a query, panicking if the placeholder count is not `N`.
    pub const fn new(sql: &'static str) -> Self {
        assert!(
            count_placeholders(sql) == N,
            "placeholder count does not match query arity"
        );
        Self { sql }
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn execute(&self, db: &dyn Database, params: [SqlValue; N]) -> DbResult<usize> {
        db.execute(self.sql, &params)
    }

    pub fn fetch_one(&self, db: &dyn Database, params: [SqlValue; N]) -> DbResult<Option<Row>> {
        db.fetch_one(self.sql, &params)
    }

    pub fn fetch_all(&self, db: &dyn Database, params: [SqlValue; N]) -> DbResult<Vec<Row>> {
        db.fetch_all(self.sql, &params)
    }
}

/// Count `?` placeholders outside single-quoted literals.
pub const fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut in_literal = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_literal = !in_literal,
            b'?' if !in_literal => count += 1,
            _ => {}
        }
        i += 1;
    }
    count
}
