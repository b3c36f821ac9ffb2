//! Import command implementation.

use ticketlog_lib::Result;

use crate::cli::{Context, ImportBeadsArgs};
use crate::format::{format_import_report, print_json};

/// Execute `import beads`.
///
/// # Errors
///
/// Returns an error if the source file is missing or the log cannot be read
/// or written. Per-line problems are reported, not returned.
pub fn execute(args: &ImportBeadsArgs, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let report = log.import_beads(&args.filepath, args.dry_run)?;

    if ctx.json {
        print_json(&report)?;
    } else {
        print!("{}", format_import_report(&report));
    }
    Ok(())
}
