//! Regenerate command implementation
//!
//! Runs schema reset, song load, log load and verification in sequence.
//! The exit code reflects the stage that failed.

use anyhow::Result;
use sk_etl::{regenerate, RegenerationOptions, Stage};

use crate::cli::{GlobalArgs, RegenerateArgs};
use crate::commands::common::{
    fail, load_context, print_batch, print_verify_report, require_confirmation, BarProgress,
    EXIT_DATABASE, EXIT_LOAD_FAILED, EXIT_VERIFY_FAILED,
};

/// Exit status for a failure while entering `stage`
pub(crate) fn stage_exit_code(stage: Stage) -> i32 {
    match stage {
        Stage::SchemaReset => EXIT_DATABASE,
        Stage::SongsLoaded | Stage::LogsLoaded => EXIT_LOAD_FAILED,
        Stage::Verified | Stage::Idle => EXIT_VERIFY_FAILED,
    }
}

/// Execute the regenerate command
pub(crate) fn execute(args: &RegenerateArgs, global: &GlobalArgs) -> Result<()> {
    require_confirmation(args.yes, "regenerate the database")?;
    let ctx = load_context(global)?;

    let options = RegenerationOptions {
        dsn: ctx.dsn(),
        song_root: ctx.song_root(args.song_data.as_deref()),
        log_root: ctx.log_root(args.log_data.as_deref()),
        extension: ctx.config.data.extension.clone(),
        probe_artist: ctx.config.verify.probe_artist.clone(),
    };

    println!("Regenerating {}...\n", options.dsn);
    let progress = BarProgress::new();
    let (_db, report) =
        regenerate(&options, &progress).map_err(|e| fail(stage_exit_code(e.stage), e))?;

    println!();
    print_batch("Song data", &report.songs);
    print_batch("Log data", &report.logs);
    println!();
    print_verify_report(&report.verification);
    println!("\nRegeneration completed successfully.");
    Ok(())
}

#[cfg(test)]
#[path = "regenerate_test.rs"]
mod tests;
