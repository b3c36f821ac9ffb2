//! List command implementation.
//!
//! Default view shows open and in-progress tasks ordered by priority, then ID.

use ticketlog_lib::{ListFilter, Result};

use crate::cli::{Context, ListArgs};
use crate::format::{format_task_list, print_json};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the log cannot be read.
pub fn execute(args: &ListArgs, ctx: &Context) -> Result<()> {
    let filter = build_filter(args)?;

    let mut log = ctx.open_log()?;
    let tasks = log.list(&filter)?;

    if ctx.json {
        print_json(&tasks)?;
    } else {
        super::print_with_hint(&log, &format_task_list(&tasks));
    }
    Ok(())
}

/// Convert CLI args to a query filter.
fn build_filter(args: &ListArgs) -> Result<ListFilter> {
    Ok(ListFilter {
        status: args.status.as_deref().map(str::parse).transpose()?,
        task_type: args.type_.as_deref().map(str::parse).transpose()?,
        assignee: args.assignee.clone(),
        label: args.label.clone(),
        all: args.all,
    })
}
