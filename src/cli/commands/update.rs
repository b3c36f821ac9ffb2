//! Update command implementation.

use ticketlog_lib::{LabelEdits, Result, TaskPatch};

use crate::cli::{Context, UpdateArgs};
use crate::format::print_json;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if a field fails to parse, the task does not exist, or
/// the new revision cannot be appended.
pub fn execute(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        task_type: args.type_.as_deref().map(str::parse).transpose()?,
        status: args.status.as_deref().map(str::parse).transpose()?,
        priority: args.priority.as_deref().map(str::parse).transpose()?,
        assignee: args.assignee.map(Some),
        notes: args.notes,
        ..Default::default()
    };
    let labels = LabelEdits {
        add: args.add_label,
        remove: args.remove_label,
    };

    let mut log = ctx.open_log()?;
    let task = log.update(&args.id, patch, &labels)?;

    if ctx.json {
        print_json(&task)?;
    } else {
        println!("Updated task {}", task.id);
    }
    Ok(())
}
