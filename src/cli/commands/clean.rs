//! Clean command implementation.

use ticketlog_lib::Result;

use crate::cli::Context;
use crate::format::{CleanSummary, print_json};

/// Execute the clean command.
///
/// # Errors
///
/// Returns an error if the log cannot be read, written, or renamed.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let report = log.compact()?;

    if ctx.json {
        return print_json(&CleanSummary::from(report));
    }

    if report.original_lines == 0 {
        println!("No tasks to clean");
    } else if report.rewritten() {
        println!(
            "Cleaned log: {} lines → {} lines (removed {} duplicates)",
            report.original_lines, report.new_lines, report.removed_lines
        );
    } else {
        println!(
            "Log already clean: {} lines (no duplicates)",
            report.original_lines
        );
    }
    Ok(())
}
