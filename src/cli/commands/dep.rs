//! Dependency command implementations (`dep`, `block`, `depends`, `unblock`).

use ticketlog_lib::{AddOutcome, RemoveOutcome, Result};

use crate::cli::Context;
use crate::format::{DependencyList, Message, format_dependency_report, print_json};

/// Make `task_id` depend on `depends_on_id`.
///
/// # Errors
///
/// Returns an error if either task is missing, the edge would create a
/// cycle, or the revision cannot be appended.
pub fn add(task_id: &str, depends_on_id: &str, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;

    match log.add_dependency(task_id, depends_on_id)? {
        AddOutcome::Added(task) if ctx.json => print_json(&task)?,
        AddOutcome::Added(_) => {
            println!("Added dependency: {task_id} depends on {depends_on_id}");
        }
        AddOutcome::AlreadyExists if ctx.json => print_json(&Message {
            message: "Dependency already exists",
        })?,
        AddOutcome::AlreadyExists => println!("Dependency already exists"),
    }
    Ok(())
}

/// Drop the `task_id -> depends_on_id` edge.
///
/// # Errors
///
/// Returns an error if the task is missing or the revision cannot be
/// appended.
pub fn remove(task_id: &str, depends_on_id: &str, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;

    match log.remove_dependency(task_id, depends_on_id)? {
        RemoveOutcome::Removed(task) if ctx.json => print_json(&task)?,
        RemoveOutcome::Removed(_) => {
            println!("Removed dependency: {task_id} no longer depends on {depends_on_id}");
        }
        RemoveOutcome::DoesNotExist if ctx.json => print_json(&Message {
            message: "Dependency does not exist",
        })?,
        RemoveOutcome::DoesNotExist => println!("Dependency does not exist"),
    }
    Ok(())
}

/// Show both directions of the dependency relation for `task_id`.
///
/// # Errors
///
/// Returns an error if the task is missing or the log cannot be read.
pub fn list(task_id: &str, ctx: &Context) -> Result<()> {
    let mut log = ctx.open_log()?;
    let report = log.dependencies(task_id)?;

    if ctx.json {
        print_json(&DependencyList::from(&report))?;
    } else {
        print!("{}", format_dependency_report(&report));
    }
    Ok(())
}
