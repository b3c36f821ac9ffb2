//! Create command implementation.

use std::collections::BTreeSet;

use ticketlog_lib::{NewTask, Priority, Result, TaskType};

use crate::cli::{Context, CreateArgs};
use crate::format::print_json;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if a field fails to parse, the title is empty, or the
/// task cannot be appended.
pub fn execute(args: CreateArgs, ctx: &Context) -> Result<()> {
    let draft = NewTask {
        title: args.title,
        description: args.description.unwrap_or_default(),
        task_type: args.type_.parse::<TaskType>()?,
        priority: args.priority.parse::<Priority>()?,
        assignee: args.assignee,
        labels: parse_labels(args.labels.as_deref()),
        ..Default::default()
    };

    let mut log = ctx.open_log()?;
    let task = log.create(draft)?;

    if ctx.json {
        print_json(&task)?;
    } else {
        println!("Created task {}", task.id);
    }
    Ok(())
}

/// Split a comma-separated label list, dropping empty entries.
fn parse_labels(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels(Some(" ui, backend ,,ui"));
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["backend", "ui"]);
        assert!(parse_labels(None).is_empty());
    }
}
