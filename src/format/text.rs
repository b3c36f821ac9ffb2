//! Text formatting functions for `ticketlog`.
//!
//! Plain text (non-ANSI) output for the terminal:
//! - Status icons (○ ◐ ◑ ✓)
//! - Priority labels (P0-P4)
//! - Type badges ([bug], [feature], etc.)
//! - Task lines, detail views, dependency reports, import progress

use std::fmt::Write as _;

use ticketlog_lib::{
    DependencyReport, ImportOutcome, ImportReport, Priority, ResolvedDependency, Status, Task,
    TaskType,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display columns allowed for a title in import progress lines.
pub const IMPORT_TITLE_WIDTH: usize = 60;

/// Status icon characters.
pub mod icons {
    /// Open - available to work (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Waiting for review (other half).
    pub const TO_REVIEW: &str = "◑";
    /// Closed - completed (checkmark).
    pub const CLOSED: &str = "✓";
    /// Warning marker.
    pub const WARNING: &str = "⚠";
    /// Failed line marker.
    pub const ERROR: &str = "✗";
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::ToReview => icons::TO_REVIEW,
        Status::Closed => icons::CLOSED,
    }
}

/// Format priority as "P0", "P1", etc.
#[must_use]
pub fn format_priority(priority: Priority) -> String {
    format!("P{}", priority.0)
}

/// Format task type as a bracketed badge.
#[must_use]
pub fn format_type_badge(task_type: TaskType) -> String {
    format!("[{}]", task_type.as_str())
}

/// Format a single-line task summary.
///
/// Format: `{icon} {id} {priority} {title} [{type}]`
#[must_use]
pub fn format_task_line(task: &Task) -> String {
    format!(
        "{} {} {} {} {}",
        format_status_icon(task.status),
        task.id,
        format_priority(task.priority),
        task.title,
        format_type_badge(task.task_type),
    )
}

/// Format a list of tasks, one per line, or a placeholder when empty.
#[must_use]
pub fn format_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found".to_string();
    }
    tasks
        .iter()
        .map(format_task_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail view used by `show`.
#[must_use]
pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", task.id, task.title);
    let _ = writeln!(out, "Created: {}", format_timestamp(&task.created_at));
    let _ = writeln!(out, "Updated: {}", format_timestamp(&task.updated_at));
    if let Some(closed_at) = task.closed_at {
        let _ = writeln!(out, "Closed: {}", format_timestamp(&closed_at));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Type:     {}", task.task_type);
    let _ = writeln!(out, "Status:   {}", task.status);
    let _ = writeln!(out, "Priority: {}", format_priority(task.priority));
    let _ = writeln!(out, "Assignee: {}", task.assignee.as_deref().unwrap_or("-"));
    if !task.labels.is_empty() {
        let labels: Vec<&str> = task.labels.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Labels:   {}", labels.join(", "));
    }

    if !task.description.is_empty() {
        let _ = write!(out, "\nDescription:\n{}\n", task.description);
    }
    if !task.notes.is_empty() {
        let _ = write!(out, "\nNotes:\n{}\n", task.notes);
    }
    if !task.dependencies.is_empty() {
        let _ = write!(out, "\nDependencies:\n");
        for dep in &task.dependencies {
            let _ = writeln!(out, "  - {dep}");
        }
    }
    out
}

/// `dep list` view: what the task waits on and what waits on it.
#[must_use]
pub fn format_dependency_report(report: &DependencyReport) -> String {
    let mut out = format!("Dependencies for {}:\n", report.task_id);

    if report.depends_on.is_empty() {
        out.push_str("\nNo dependencies\n");
    } else {
        out.push_str("\nDepends on (blocks this task):\n");
        for dep in &report.depends_on {
            match dep {
                ResolvedDependency::Found(task) => {
                    let _ = writeln!(out, "  - {}: {} [{}]", task.id, task.title, task.status);
                }
                ResolvedDependency::NotFound(id) => {
                    let _ = writeln!(out, "  - {id}: (not found)");
                }
            }
        }
    }

    if report.blocks.is_empty() {
        out.push_str("\nDoes not block any tasks\n");
    } else {
        out.push_str("\nBlocks these tasks:\n");
        for task in &report.blocks {
            let _ = writeln!(out, "  - {}: {} [{}]", task.id, task.title, task.status);
        }
    }
    out
}

/// One progress line per import outcome, followed by its warnings.
#[must_use]
pub fn format_import_outcome(outcome: &ImportOutcome, dry_run: bool) -> String {
    match outcome {
        ImportOutcome::Imported {
            id,
            title,
            task_type,
            warnings,
        } => {
            let icon = if dry_run { icons::OPEN } else { icons::CLOSED };
            let mut line = format!(
                "{icon} {id}: {}: {}",
                capitalize(task_type.as_str()),
                truncate_title(title, IMPORT_TITLE_WIDTH)
            );
            for warning in warnings {
                let _ = write!(line, "\n  {} {warning}", icons::WARNING);
            }
            line
        }
        ImportOutcome::Skipped { id, reason } => {
            format!("{} {id}: Skipped ({reason})", icons::WARNING)
        }
        ImportOutcome::Error { line, error } => {
            format!("{} Line {line}: {error}", icons::ERROR)
        }
    }
}

/// Full import report: header, progress lines, summary.
#[must_use]
pub fn format_import_report(report: &ImportReport) -> String {
    let mut out = format!("Importing from beads: {}\n\n", report.source_file.display());
    for outcome in &report.details {
        out.push_str(&format_import_outcome(outcome, report.dry_run));
        out.push('\n');
    }

    out.push_str("\nSummary:\n");
    if report.dry_run {
        out.push_str("  (Dry run - no changes made)\n");
    }
    let _ = writeln!(out, "  Imported: {}", report.stats.imported);
    if report.stats.skipped > 0 {
        let _ = writeln!(out, "  Skipped:  {}", report.stats.skipped);
    }
    if report.stats.errors > 0 {
        let _ = writeln!(out, "  Errors:   {}", report.stats.errors);
    }
    out
}

/// Cut `title` to at most `max_width` display columns, ending in "..."
/// when shortened.
#[must_use]
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.width() <= max_width {
        return title.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for ch in title.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ticketlog_lib::NewTask;

    fn make_test_task() -> Task {
        Task::create(
            "tl-abc",
            NewTask {
                title: "Test title".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_status_icons() {
        assert_eq!(format_status_icon(Status::Open), "○");
        assert_eq!(format_status_icon(Status::InProgress), "◐");
        assert_eq!(format_status_icon(Status::ToReview), "◑");
        assert_eq!(format_status_icon(Status::Closed), "✓");
    }

    #[test]
    fn test_format_type_badge() {
        assert_eq!(format_type_badge(TaskType::Task), "[task]");
        assert_eq!(format_type_badge(TaskType::Bug), "[bug]");
        assert_eq!(format_type_badge(TaskType::Chore), "[chore]");
    }

    #[test]
    fn test_format_task_line_open() {
        let task = make_test_task();
        assert_eq!(format_task_line(&task), "○ tl-abc P2 Test title [task]");
    }

    #[test]
    fn test_format_task_line_bug_high_priority() {
        let mut task = make_test_task();
        task.task_type = TaskType::Bug;
        task.priority = Priority::HIGH;
        task.status = Status::Closed;
        let line = format_task_line(&task);
        assert!(line.starts_with("✓"));
        assert!(line.contains(" P1 "));
        assert!(line.ends_with("[bug]"));
    }

    #[test]
    fn test_empty_list_placeholder() {
        assert_eq!(format_task_list(&[]), "No tasks found");
    }

    #[test]
    fn test_detail_lists_optional_sections() {
        let mut task = make_test_task();
        assert!(!format_task_detail(&task).contains("Notes:"));
        task.notes = "Canceled".to_string();
        task.dependencies.push("tl-xyz".to_string());
        let detail = format_task_detail(&task);
        assert!(detail.starts_with("tl-abc: Test title\n"));
        assert!(detail.contains("Assignee: -"));
        assert!(detail.contains("Notes:\nCanceled"));
        assert!(detail.contains("  - tl-xyz"));
    }

    #[test]
    fn test_dependency_report_text() {
        let blocker = make_test_task();
        let report = DependencyReport {
            task_id: "tl-top".to_string(),
            depends_on: vec![
                ResolvedDependency::Found(blocker),
                ResolvedDependency::NotFound("tl-999".to_string()),
            ],
            blocks: Vec::new(),
        };
        let text = format_dependency_report(&report);
        assert!(text.contains("  - tl-abc: Test title [open]"));
        assert!(text.contains("  - tl-999: (not found)"));
        assert!(text.contains("Does not block any tasks"));
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short", 60), "short");
        let long = "x".repeat(70);
        let cut = truncate_title(&long, 60);
        assert_eq!(cut.len(), 60);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_title_counts_wide_chars() {
        let wide = "日本語".repeat(20);
        let cut = truncate_title(&wide, 10);
        assert!(cut.width() <= 10);
        assert_eq!(cut, "日本語...");
    }

    #[test]
    fn test_import_outcome_lines() {
        let imported = ImportOutcome::Imported {
            id: "bd-1".to_string(),
            title: "Fix".to_string(),
            task_type: TaskType::Bug,
            warnings: vec!["Unknown status 'x', defaulting to 'open'".to_string()],
        };
        assert_eq!(
            format_import_outcome(&imported, false),
            "✓ bd-1: Bug: Fix\n  ⚠ Unknown status 'x', defaulting to 'open'"
        );
        assert!(format_import_outcome(&imported, true).starts_with("○ "));

        let error = ImportOutcome::Error {
            line: 4,
            error: "Missing required field: id".to_string(),
        };
        assert_eq!(
            format_import_outcome(&error, false),
            "✗ Line 4: Missing required field: id"
        );
    }

    proptest! {
        #[test]
        fn prop_truncated_title_fits(title in "[a-zA-Z0-9 éü日本語]{0,120}", max in 3usize..80) {
            let cut = truncate_title(&title, max);
            prop_assert!(cut.width() <= max);
            if title.width() <= max {
                prop_assert_eq!(cut, title);
            } else {
                prop_assert!(cut.ends_with("..."));
            }
        }
    }
}
