//! Import of beads JSONL exports.
//!
//! Each non-blank line of the source is mapped to a [`Task`] independently.
//! Lines that fail to parse or map are recorded as errors and the import
//! continues; IDs that already exist are skipped.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TicketlogError};
use crate::model::{Priority, Status, Task, TaskType, now};

/// Raw beads record. Only the fields that map onto a task are read.
#[derive(Debug, Default, Deserialize)]
struct BeadsRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    issue_type: Option<String>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    closed_at: Option<String>,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    close_reason: Option<String>,
}

/// What happened to one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported {
        id: String,
        title: String,
        #[serde(rename = "type")]
        task_type: TaskType,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Skipped {
        id: String,
        reason: String,
    },
    Error {
        line: usize,
        error: String,
    },
}

/// Aggregate counts for an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total_lines: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Full result of an import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub source_file: PathBuf,
    pub dry_run: bool,
    pub stats: ImportStats,
    pub details: Vec<ImportOutcome>,
}

impl ImportReport {
    fn record(&mut self, outcome: ImportOutcome) {
        match outcome {
            ImportOutcome::Imported { .. } => self.stats.imported += 1,
            ImportOutcome::Skipped { .. } => self.stats.skipped += 1,
            ImportOutcome::Error { .. } => self.stats.errors += 1,
        }
        self.details.push(outcome);
    }
}

/// Import every line of `path`.
///
/// `existing` holds the IDs already in the log; IDs imported by earlier
/// lines are added to it so later duplicates are skipped. `write` is called
/// for each mapped task unless `dry_run` is set.
///
/// # Errors
///
/// Returns `FileNotFound` if `path` does not exist, or the first error from
/// reading the source or from `write`. Per-line problems are reported in the
/// returned [`ImportReport`] instead.
pub fn import_beads<F>(
    path: &Path,
    existing: &mut HashSet<String>,
    dry_run: bool,
    mut write: F,
) -> Result<ImportReport>
where
    F: FnMut(&Task) -> Result<()>,
{
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TicketlogError::FileNotFound(path.to_path_buf())
        } else {
            TicketlogError::Io(e)
        }
    })?;

    let mut report = ImportReport {
        source_file: path.to_path_buf(),
        dry_run,
        stats: ImportStats::default(),
        details: Vec::new(),
    };

    for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
        let raw = raw?;
        let line_num = index + 1;
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                report.stats.total_lines += 1;
                tracing::debug!(line = line_num, error = %e, "import line is not UTF-8");
                report.record(ImportOutcome::Error {
                    line: line_num,
                    error: format!("Invalid UTF-8: {}", e.utf8_error()),
                });
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.stats.total_lines += 1;

        let (task, warnings) = match map_line(trimmed) {
            Ok(mapped) => mapped,
            Err(error) => {
                tracing::debug!(line = line_num, %error, "import line rejected");
                report.record(ImportOutcome::Error {
                    line: line_num,
                    error,
                });
                continue;
            }
        };

        if existing.contains(&task.id) {
            report.record(ImportOutcome::Skipped {
                id: task.id,
                reason: "ID already exists".to_string(),
            });
            continue;
        }

        if !dry_run {
            write(&task)?;
        }
        existing.insert(task.id.clone());

        for warning in &warnings {
            tracing::info!(id = %task.id, "{warning}");
        }
        report.record(ImportOutcome::Imported {
            id: task.id,
            title: task.title,
            task_type: task.task_type,
            warnings,
        });
    }

    tracing::info!(
        imported = report.stats.imported,
        skipped = report.stats.skipped,
        errors = report.stats.errors,
        dry_run,
        "import finished"
    );
    Ok(report)
}

/// Map one beads line to a task and the warnings raised along the way.
fn map_line(line: &str) -> std::result::Result<(Task, Vec<String>), String> {
    let record: BeadsRecord =
        serde_json::from_str(line).map_err(|e| format!("Invalid JSON: {e}"))?;
    map_record(record)
}

fn map_record(record: BeadsRecord) -> std::result::Result<(Task, Vec<String>), String> {
    let mut warnings = Vec::new();

    let id = record
        .id
        .filter(|s| !s.is_empty())
        .ok_or("Missing required field: id")?;
    let title = record
        .title
        .filter(|s| !s.trim().is_empty())
        .ok_or("Missing required field: title")?;

    let status = match record.status.as_deref() {
        None => Status::Open,
        Some(raw) => map_status(raw).unwrap_or_else(|| {
            warnings.push(format!("Unknown status '{raw}', defaulting to 'open'"));
            Status::Open
        }),
    };

    let task_type = match record.issue_type.as_deref() {
        None => TaskType::Task,
        Some(raw) => map_type(raw).unwrap_or_else(|| {
            warnings.push(format!("Unknown type '{raw}', defaulting to 'task'"));
            TaskType::Task
        }),
    };

    let priority = map_priority(record.priority.as_ref(), &mut warnings);

    let created_at = parse_timestamp(record.created_at.as_deref())?;
    let updated_at = parse_timestamp(record.updated_at.as_deref())?;
    let closed_at = parse_timestamp(record.closed_at.as_deref())?;

    let imported_at = now();
    let created_at = created_at.unwrap_or(imported_at);
    let updated_at = updated_at.unwrap_or(imported_at);
    // Keep closed tasks consistent with the closed_at invariant.
    let closed_at = closed_at.or_else(|| (status == Status::Closed).then_some(updated_at));

    let notes = [
        record.created_by.map(|who| format!("Created by: {who}")),
        record.close_reason.map(|why| format!("Close reason: {why}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n");

    let task = Task {
        id,
        title,
        created_at,
        updated_at,
        description: record.description.unwrap_or_default(),
        task_type,
        status,
        priority,
        assignee: record.owner.filter(|o| !o.is_empty()),
        labels: std::collections::BTreeSet::new(),
        closed_at,
        dependencies: Vec::new(),
        notes,
    };
    Ok((task, warnings))
}

fn map_status(raw: &str) -> Option<Status> {
    match raw.to_lowercase().as_str() {
        "open" => Some(Status::Open),
        "in_progress" => Some(Status::InProgress),
        "to_review" => Some(Status::ToReview),
        "closed" => Some(Status::Closed),
        _ => None,
    }
}

fn map_type(raw: &str) -> Option<TaskType> {
    match raw.to_lowercase().as_str() {
        "task" => Some(TaskType::Task),
        "bug" => Some(TaskType::Bug),
        "feature" => Some(TaskType::Feature),
        "epic" => Some(TaskType::Epic),
        "chore" => Some(TaskType::Chore),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn map_priority(raw: Option<&Value>, warnings: &mut Vec<String>) -> Priority {
    let number = match raw {
        None | Some(Value::Null) => return Priority::MEDIUM,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(p) => Priority::new(p).unwrap_or_else(|_| {
            warnings.push(format!("Priority {p} out of range, defaulting to 2"));
            Priority::MEDIUM
        }),
        None => {
            let shown = match raw {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            warnings.push(format!("Invalid priority '{shown}', defaulting to 2"));
            Priority::MEDIUM
        }
    }
}

/// Parse an ISO-8601 timestamp and convert it to UTC.
///
/// Timestamps without an offset are taken as UTC.
fn parse_timestamp(raw: Option<&str>) -> std::result::Result<Option<DateTime<Utc>>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| format!("Timestamp conversion failed: Invalid timestamp format: {raw}"))
}
