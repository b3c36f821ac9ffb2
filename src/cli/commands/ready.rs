//! Ready command implementation.

use ticketlog_lib::Result;

use crate::cli::Context;
use crate::format::{format_task_list, print_json};

/// Execute the ready command.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let tasks = log.ready()?;

    if ctx.json {
        print_json(&tasks)?;
    } else {
        super::print_with_hint(&log, &format_task_list(&tasks));
    }
    Ok(())
}
