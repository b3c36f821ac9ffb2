//! Close command implementation.

use ticketlog_lib::Result;

use crate::cli::{CloseArgs, Context};
use crate::format::print_json;

/// Execute the close command.
///
/// Unknown IDs are reported on stderr and skipped.
///
/// # Errors
///
/// Returns an error if the log cannot be read or written.
pub fn execute(args: &CloseArgs, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;

    let outcome = if args.review {
        let outcome = log.close_in_review()?;
        if outcome.is_empty() && !ctx.json {
            println!("No tasks found in to_review status");
            return Ok(());
        }
        outcome
    } else {
        log.close(&args.ids)?
    };
    super::report_not_found(&outcome);

    if ctx.json {
        print_json(&outcome.changed)?;
    } else {
        match outcome.changed.as_slice() {
            [] => {}
            [task] => println!("Closed task {}", task.id),
            tasks => println!("Closed {} tasks", tasks.len()),
        }
    }
    Ok(())
}
