//! Start command implementation.

use ticketlog_lib::Result;

use crate::cli::{Context, StartArgs};
use crate::format::print_json;

/// Execute the start command.
///
/// # Errors
///
/// Returns an error if the task does not exist or the revision cannot be
/// appended.
pub fn execute(args: &StartArgs, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let task = log.start(&args.id, args.assignee.clone())?;

    if ctx.json {
        print_json(&task)?;
        return Ok(());
    }

    let message = match args.assignee.as_deref() {
        Some(assignee) => format!("Started task {} (assigned to {assignee})", task.id),
        None => format!("Started task {}", task.id),
    };
    super::print_with_hint(&log, &message);
    Ok(())
}
