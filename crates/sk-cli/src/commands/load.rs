//! Load command implementation

use anyhow::Result;
use sk_etl::{load_all, missing_tables};

use crate::cli::{GlobalArgs, LoadArgs};
use crate::commands::common::{
    fail, load_context, open_existing_database, print_batch, BarProgress, EXIT_DATABASE,
    EXIT_LOAD_FAILED,
};

/// Execute the load command
pub(crate) fn execute(args: &LoadArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let dsn = ctx.dsn();
    let song_root = ctx.song_root(args.song_root.as_deref());
    let log_root = ctx.log_root(args.log_root.as_deref());

    let db = open_existing_database(&dsn)?;
    let missing = missing_tables(db.as_ref()).map_err(|e| fail(EXIT_DATABASE, e))?;
    if !missing.is_empty() {
        return Err(fail(
            EXIT_DATABASE,
            format!(
                "{dsn} is missing tables: {}. Run `sparkify reset-schema --yes` first.",
                missing.join(", ")
            ),
        ));
    }

    if global.verbose {
        eprintln!(
            "[verbose] Loading songs from {} and logs from {}",
            song_root.display(),
            log_root.display()
        );
    }

    let progress = BarProgress::new();
    let summary = load_all(
        db.as_ref(),
        &song_root,
        &log_root,
        &ctx.config.data.extension,
        &progress,
    )
    .map_err(|e| fail(EXIT_LOAD_FAILED, e))?;

    println!();
    print_batch("Song data", &summary.songs);
    print_batch("Log data", &summary.logs);
    Ok(())
}
