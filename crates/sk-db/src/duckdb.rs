//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Row, SqlValue};
use chrono::DateTime;
use duckdb::types::{TimeUnit, ToSql, ToSqlOutput, Value, ValueRef};
use duckdb::{params_from_iter, Connection};
use std::path::Path;

/// DSN selecting a private in-memory database
pub const MEMORY_DSN: &str = ":memory:";

/// DuckDB database backend
///
/// Single-threaded, no `Mutex` needed because the pipeline uses its one
/// connection sequentially.
pub struct DuckDbBackend {
    conn: Connection,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == MEMORY_DSN {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }
}

/// Open a connection for `dsn` (`:memory:` or a DuckDB file path).
pub fn connect(dsn: &str) -> DbResult<Box<dyn Database>> {
    log::debug!("Connecting to DuckDB at {dsn}");
    Ok(Box::new(DuckDbBackend::new(dsn)?))
}

/// Remove the database file behind `dsn` and its write-ahead log.
///
/// Returns whether a database file existed. `:memory:` has nothing to drop.
pub fn drop_database(dsn: &str) -> DbResult<bool> {
    if dsn == MEMORY_DSN {
        return Ok(false);
    }

    let path = Path::new(dsn);
    let existed = path.exists();
    if existed {
        std::fs::remove_file(path).map_err(|e| DbError::DropDatabase {
            path: dsn.to_string(),
            source: e,
        })?;
    }

    let wal_path = format!("{dsn}.wal");
    if Path::new(&wal_path).exists() {
        std::fs::remove_file(&wal_path).map_err(|e| DbError::DropDatabase {
            path: wal_path.clone(),
            source: e,
        })?;
    }
    Ok(existed)
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Int(i) => ToSqlOutput::Owned(Value::BigInt(*i)),
            SqlValue::Float(f) => ToSqlOutput::Owned(Value::Double(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Timestamp(ts) => ToSqlOutput::Owned(Value::Timestamp(
                TimeUnit::Microsecond,
                ts.and_utc().timestamp_micros(),
            )),
        })
    }
}

/// Convert a fetched DuckDB value into the engine-neutral form.
fn from_duckdb_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Int(i64::from(b)),
        Value::TinyInt(i) => SqlValue::Int(i64::from(i)),
        Value::SmallInt(i) => SqlValue::Int(i64::from(i)),
        Value::Int(i) => SqlValue::Int(i64::from(i)),
        Value::BigInt(i) => SqlValue::Int(i),
        Value::UTinyInt(i) => SqlValue::Int(i64::from(i)),
        Value::USmallInt(i) => SqlValue::Int(i64::from(i)),
        Value::UInt(i) => SqlValue::Int(i64::from(i)),
        Value::Float(f) => SqlValue::Float(f64::from(f)),
        Value::Double(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(unit, raw) => DateTime::from_timestamp_micros(unit.to_micros(raw))
            .map_or(SqlValue::Null, |dt| SqlValue::Timestamp(dt.naive_utc())),
        other => SqlValue::Text(format!("{other:?}")),
    }
}

impl Database for DuckDbBackend {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(|e| DbError::from(e).with_statement(sql))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql).map_err(DbError::from)
    }

    fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DbError::from(e).with_statement(sql))?;

        // DuckDB 1.4 panics on `stmt.column_count()` before execution, so the
        // column count is read from each row's statement instead.
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                let mut values = Vec::with_capacity(col_count);
                for i in 0..col_count {
                    values.push(from_duckdb_value(row.get::<_, Value>(i)?));
                }
                Ok(Row::new(values))
            })
            .map_err(|e| DbError::from(e).with_statement(sql))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::from)?;
        Ok(rows)
    }

    fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl DbError {
    /// Attach the failing statement to an execution error message.
    fn with_statement(self, sql: &str) -> Self {
        match self {
            DbError::ExecutionError(msg) => DbError::ExecutionError(format!("{msg}: {sql}")),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
