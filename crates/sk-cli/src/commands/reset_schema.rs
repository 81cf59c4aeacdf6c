//! Reset-schema command implementation

use anyhow::Result;
use sk_etl::ddl::TABLES;
use sk_etl::reset_schema;

use crate::cli::{GlobalArgs, ResetSchemaArgs};
use crate::commands::common::{fail, load_context, require_confirmation, EXIT_DATABASE};

/// Execute the reset-schema command
pub(crate) fn execute(args: &ResetSchemaArgs, global: &GlobalArgs) -> Result<()> {
    require_confirmation(args.yes, "drop and recreate the database")?;
    let ctx = load_context(global)?;
    let dsn = ctx.dsn();

    println!("Resetting schema in {dsn}...");
    let db = reset_schema(&dsn).map_err(|e| fail(EXIT_DATABASE, e))?;

    println!("Created {} tables: {}", TABLES.len(), TABLES.join(", "));
    log::debug!("Closing {} connection", db.db_type());
    Ok(())
}
