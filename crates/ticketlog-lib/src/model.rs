//! Core data types for ticketlog.
//!
//! A [`Task`] is never edited in place: every change derives a new revision
//! through [`Task::with_updates`], and the caller appends that revision to
//! the log.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketlogError};
use crate::query::{NewTask, TaskPatch};

/// Live tasks keyed by ID, as produced by replaying the log.
pub type TaskMap = BTreeMap<String, Task>;

/// Current time truncated to microseconds, the precision stored in the log.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    ToReview,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::ToReview => "to_review",
            Self::Closed => "closed",
        }
    }

    /// Statuses shown by `list` when no status filter is given.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TicketlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "o" | "open" => Ok(Self::Open),
            "ip" | "wip" | "progress" | "in_progress" => Ok(Self::InProgress),
            "tr" | "review" | "to_review" => Ok(Self::ToReview),
            "c" | "done" | "closed" => Ok(Self::Closed),
            other => Err(TicketlogError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Task type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Task,
    Bug,
    Feature,
    Epic,
    Chore,
}

impl TaskType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Chore => "chore",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = TicketlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "t" | "task" => Ok(Self::Task),
            "b" | "bug" => Ok(Self::Bug),
            "f" | "feat" | "feature" => Ok(Self::Feature),
            "e" | "epic" => Ok(Self::Epic),
            "c" | "chore" => Ok(Self::Chore),
            other => Err(TicketlogError::InvalidType {
                task_type: other.to_string(),
            }),
        }
    }
}

/// Task priority (0=Critical, 4=Backlog).
///
/// Stored as a bare number; values outside 0-4 fail to deserialize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(pub u8);

impl Priority {
    pub const CRITICAL: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const LOW: Self = Self(3);
    pub const BACKLOG: Self = Self(4);

    /// Build a priority from a raw number, rejecting anything outside 0-4.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPriority` when `value` is out of range.
    pub fn new(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|p| *p <= Self::BACKLOG.0)
            .map(Self)
            .ok_or_else(|| TicketlogError::InvalidPriority {
                value: value.to_string(),
            })
    }
}

impl TryFrom<u8> for Priority {
    type Error = TicketlogError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(i64::from(value))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = TicketlogError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        let digits = upper.strip_prefix('P').unwrap_or(&upper);

        digits
            .parse::<i64>()
            .ok()
            .and_then(|p| Self::new(p).ok())
            .ok_or_else(|| TicketlogError::InvalidPriority {
                value: s.trim().to_string(),
            })
    }
}

/// One revision of a task, exactly as stored on a log line.
///
/// Field order follows the log format so lines stay diff-friendly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique ID (e.g., "tl-a3f"). Never changes across revisions.
    pub id: String,

    /// Title, never empty.
    pub title: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last revision timestamp.
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type", default)]
    pub task_type: TaskType,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub assignee: Option<String>,

    #[serde(default)]
    pub labels: BTreeSet<String>,

    /// Set once, on the first transition into `closed`.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// IDs of the tasks this task is blocked by, in insertion order.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Free-form notes; cancel appends to them.
    #[serde(default)]
    pub notes: String,
}

impl Task {
    /// Create the first revision of a task.
    ///
    /// Both timestamps are stamped with the same instant.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the title is empty.
    pub fn create(id: impl Into<String>, draft: NewTask) -> Result<Self> {
        Self::create_at(id, draft, now())
    }

    /// Same as [`Task::create`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the title is empty.
    pub fn create_at(id: impl Into<String>, draft: NewTask, at: DateTime<Utc>) -> Result<Self> {
        if draft.title.trim().is_empty() {
            return Err(TicketlogError::validation("title", "cannot be empty"));
        }

        let closed_at = (draft.status == Status::Closed).then_some(at);
        Ok(Self {
            id: id.into(),
            title: draft.title,
            created_at: at,
            updated_at: at,
            description: draft.description,
            task_type: draft.task_type,
            status: draft.status,
            priority: draft.priority,
            assignee: draft.assignee,
            labels: draft.labels,
            closed_at,
            dependencies: Vec::new(),
            notes: draft.notes,
        })
    }

    /// Derive the next revision of this task.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the patch would leave the title empty.
    pub fn with_updates(&self, patch: &TaskPatch) -> Result<Self> {
        self.with_updates_at(patch, now())
    }

    /// Same as [`Task::with_updates`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the patch would leave the title empty.
    pub fn with_updates_at(&self, patch: &TaskPatch, at: DateTime<Utc>) -> Result<Self> {
        let mut next = self.clone();

        if let Some(ref title) = patch.title {
            if title.trim().is_empty() {
                return Err(TicketlogError::validation("title", "cannot be empty"));
            }
            next.title.clone_from(title);
        }
        if let Some(ref description) = patch.description {
            next.description.clone_from(description);
        }
        if let Some(task_type) = patch.task_type {
            next.task_type = task_type;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(ref assignee) = patch.assignee {
            next.assignee.clone_from(assignee);
        }
        if let Some(ref notes) = patch.notes {
            next.notes.clone_from(notes);
        }
        if let Some(ref labels) = patch.labels {
            next.labels.clone_from(labels);
        }
        if let Some(ref dependencies) = patch.dependencies {
            next.dependencies.clone_from(dependencies);
        }
        if let Some(status) = patch.status {
            next.status = status;
            if status == Status::Closed && next.closed_at.is_none() {
                next.closed_at = Some(at);
            }
        }

        next.updated_at = at;
        Ok(next)
    }

    /// Notes with `note` appended on its own line.
    #[must_use]
    pub fn notes_with(&self, note: &str) -> String {
        if self.notes.is_empty() {
            note.to_string()
        } else {
            format!("{}\n{note}", self.notes)
        }
    }

    #[must_use]
    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d == id)
    }
}

/// Note appended to a task when it is canceled.
#[must_use]
pub fn cancel_note(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.trim().is_empty() => format!("Canceled, with reason: {reason}"),
        _ => "Canceled".to_string(),
    }
}
