//! Cancel command implementation.
//!
//! Cancel closes the task and appends a cancellation note.

use ticketlog_lib::Result;

use crate::cli::{CancelArgs, Context};
use crate::format::print_json;

/// Execute the cancel command.
///
/// # Errors
///
/// Returns an error if the log cannot be read or written.
pub fn execute(args: &CancelArgs, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let outcome = log.cancel(&args.ids, args.reason.as_deref())?;
    super::report_not_found(&outcome);

    if ctx.json {
        print_json(&outcome.changed)?;
    } else {
        match outcome.changed.as_slice() {
            [] => {}
            [task] => println!("Canceled task {}", task.id),
            tasks => println!("Canceled {} tasks", tasks.len()),
        }
    }
    Ok(())
}
