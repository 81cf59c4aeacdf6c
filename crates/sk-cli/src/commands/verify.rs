//! Verify command implementation

use anyhow::Result;
use sk_verify::Verifier;

use crate::cli::{GlobalArgs, VerifyArgs};
use crate::commands::common::{
    load_context, open_existing_database, print_verify_report, ExitCode, EXIT_VERIFY_FAILED,
};

/// Execute the verify command
pub(crate) fn execute(args: &VerifyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let db = open_existing_database(&ctx.dsn())?;

    let artist = args
        .artist
        .as_deref()
        .unwrap_or(&ctx.config.verify.probe_artist);

    println!("Running verification queries...\n");
    let report = Verifier::new(db.as_ref(), artist).run();
    print_verify_report(&report);

    if let Err(e) = report.into_result() {
        eprintln!("{e}");
        return Err(ExitCode(EXIT_VERIFY_FAILED).into());
    }
    Ok(())
}
