//! Database trait definition

use crate::error::DbResult;
use crate::value::{Row, SqlValue};

/// Storage boundary for Sparkify
///
/// One connection, used sequentially by one logical flow. Components receive
/// it as `&dyn Database`; nothing holds a global connection.
pub trait Database {
    /// Execute one statement with positional parameters, returns affected rows
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute multiple parameterless statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and collect every row
    fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Run a query and return its first row, if any
    fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> DbResult<Option<Row>> {
        Ok(self.fetch_all(sql, params)?.into_iter().next())
    }

    /// Start a unit of work
    fn begin(&self) -> DbResult<()>;

    /// Commit the current unit of work
    fn commit(&self) -> DbResult<()>;

    /// Discard the current unit of work
    fn rollback(&self) -> DbResult<()>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
