//! Show command implementation.

use ticketlog_lib::Result;

use crate::cli::Context;
use crate::format::{format_task_detail, print_json};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the task does not exist or the log cannot be read.
pub fn execute(id: &str, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let task = log.get(id)?;

    if ctx.json {
        print_json(&task)?;
    } else {
        super::print_with_hint(&log, &format_task_detail(&task));
    }
    Ok(())
}
