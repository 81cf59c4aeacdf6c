//! Schema Manager: destructive reset of the star schema.
//!
//! Nothing in this module runs implicitly. [`reset_schema`] is called only by
//! the explicit `reset-schema` and `regenerate` entry points.

use crate::ddl::{CREATE_TABLES, DROP_TABLES, TABLES};
use crate::error::{EtlError, EtlResult};
use sk_db::{connect, drop_database, Database};

/// Drop the database behind `dsn`, reconnect, and rebuild all tables.
///
/// Returns the fresh connection, which callers must keep using for an
/// in-memory database since a new `:memory:` connection is a new database.
pub fn reset_schema(dsn: &str) -> EtlResult<Box<dyn Database>> {
    if drop_database(dsn).map_err(EtlError::schema("drop database"))? {
        log::info!("Dropped existing database {dsn}");
    }

    let db = connect(dsn).map_err(EtlError::schema("connect"))?;
    drop_tables(db.as_ref())?;
    create_tables(db.as_ref())?;
    log::info!("Created {} tables in {}", TABLES.len(), dsn);
    Ok(db)
}

/// Drop every schema table and the songplay sequence if present.
pub fn drop_tables(db: &dyn Database) -> EtlResult<()> {
    db.execute_batch(DROP_TABLES)
        .map_err(EtlError::schema("drop tables"))
}

/// Create the songplay sequence and every schema table.
pub fn create_tables(db: &dyn Database) -> EtlResult<()> {
    db.execute_batch(CREATE_TABLES)
        .map_err(EtlError::schema("create tables"))
}

/// Tables from the schema that are missing in `db`.
pub fn missing_tables(db: &dyn Database) -> EtlResult<Vec<&'static str>> {
    let mut missing = Vec::new();
    for table in TABLES {
        if !db
            .relation_exists(table)
            .map_err(EtlError::schema("inspect tables"))?
        {
            missing.push(*table);
        }
    }
    Ok(missing)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
