//! High-level task operations over a [`LogStore`].
//!
//! Every operation replays the log once, derives any new revisions, and
//! appends them. Nothing is cached between calls.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, TicketlogError};
use crate::graph::{self, AddOutcome, DependencyReport, RemoveOutcome};
use crate::id;
use crate::import::{self, ImportReport};
use crate::log::{CompactionReport, DeadHistoryWarning, LogStore};
use crate::model::{Status, Task, TaskMap, cancel_note};
use crate::query::{LabelEdits, ListFilter, NewTask, TaskPatch, filter_tasks};

/// Default ID prefix.
pub const DEFAULT_PREFIX: &str = "tl";

/// Default dead-history ratio above which a compaction hint is emitted.
pub const DEFAULT_DEAD_HISTORY_THRESHOLD: f64 = 0.3;

/// Result of a batch operation that skips unknown IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// New revisions, in request order.
    pub changed: Vec<Task>,
    /// Requested IDs with no live task.
    pub not_found: Vec<String>,
}

impl BatchOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.not_found.is_empty()
    }
}

/// A task log file plus the project settings that shape its operations.
#[derive(Debug)]
pub struct TaskLog {
    store: LogStore,
    prefix: String,
    dead_history_threshold: f64,
}

impl TaskLog {
    /// Open the log at `path` with default settings. The file is created on
    /// first append.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            store: LogStore::new(path),
            prefix: DEFAULT_PREFIX.to_string(),
            dead_history_threshold: DEFAULT_DEAD_HISTORY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn with_dead_history_threshold(mut self, threshold: f64) -> Self {
        self.dead_history_threshold = threshold;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub const fn store(&self) -> &LogStore {
        &self.store
    }

    // ========================================================================
    // Single-task operations
    // ========================================================================

    /// Create a task with a fresh ID and append its first revision.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title, `Exhausted` if no free ID
    /// was found, or any load/append error.
    pub fn create(&mut self, draft: NewTask) -> Result<Task> {
        let tasks = self.store.load_all()?;
        let id = id::next_id(&self.prefix, |candidate| tasks.contains_key(candidate))?;
        let task = Task::create(id, draft)?;
        self.store.append(&task)?;
        tracing::info!(id = %task.id, "created task");
        Ok(task)
    }

    /// Latest revision of `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no task has that ID.
    pub fn get(&mut self, id: &str) -> Result<Task> {
        let mut tasks = self.store.load_all()?;
        take(&mut tasks, id)
    }

    /// Apply `patch` and `labels` to `id` and append the result.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Validation`, or any load/append error.
    pub fn update(&mut self, id: &str, mut patch: TaskPatch, labels: &LabelEdits) -> Result<Task> {
        let mut tasks = self.store.load_all()?;
        let task = take(&mut tasks, id)?;

        if !labels.is_empty() {
            patch.labels = Some(labels.apply(&task.labels));
        }
        self.save(task.with_updates(&patch)?)
    }

    /// Move `id` to `in_progress`, optionally assigning it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or any load/append error.
    pub fn start(&mut self, id: &str, assignee: Option<String>) -> Result<Task> {
        let mut tasks = self.store.load_all()?;
        let task = take(&mut tasks, id)?;
        let patch = TaskPatch {
            status: Some(Status::InProgress),
            assignee: assignee.map(Some),
            ..Default::default()
        };
        self.save(task.with_updates(&patch)?)
    }

    // ========================================================================
    // Batch operations
    // ========================================================================

    /// Close each of `ids`, skipping unknown ones.
    ///
    /// # Errors
    ///
    /// Returns load/append errors; unknown IDs are reported in the outcome.
    pub fn close(&mut self, ids: &[String]) -> Result<BatchOutcome> {
        self.apply_each(ids, |_| TaskPatch {
            status: Some(Status::Closed),
            ..Default::default()
        })
    }

    /// Close every task currently in `to_review`.
    ///
    /// # Errors
    ///
    /// Returns load/append errors.
    pub fn close_in_review(&mut self) -> Result<BatchOutcome> {
        let tasks = self.store.load_all()?;
        let ids: Vec<String> = tasks
            .values()
            .filter(|t| t.status == Status::ToReview)
            .map(|t| t.id.clone())
            .collect();
        self.close(&ids)
    }

    /// Close each of `ids` and record the cancellation in its notes.
    ///
    /// # Errors
    ///
    /// Returns load/append errors; unknown IDs are reported in the outcome.
    pub fn cancel(&mut self, ids: &[String], reason: Option<&str>) -> Result<BatchOutcome> {
        let note = cancel_note(reason);
        self.apply_each(ids, |task| TaskPatch {
            status: Some(Status::Closed),
            notes: Some(task.notes_with(&note)),
            ..Default::default()
        })
    }

    fn apply_each<F>(&mut self, ids: &[String], patch_for: F) -> Result<BatchOutcome>
    where
        F: Fn(&Task) -> TaskPatch,
    {
        let mut tasks = self.store.load_all()?;
        let mut outcome = BatchOutcome::default();

        for id in ids {
            let Some(task) = tasks.get(id) else {
                tracing::debug!(%id, "skipping unknown task");
                outcome.not_found.push(id.clone());
                continue;
            };
            let next = task.with_updates(&patch_for(task))?;
            self.store.append(&next)?;
            tasks.insert(next.id.clone(), next.clone());
            outcome.changed.push(next);
        }
        Ok(outcome)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks matching `filter`, by priority then ID.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn list(&mut self, filter: &ListFilter) -> Result<Vec<Task>> {
        let tasks = self.store.load_all()?;
        Ok(filter_tasks(tasks.values(), filter).into_iter().cloned().collect())
    }

    /// Open tasks with every dependency closed, by priority then ID.
    ///
    /// # Errors
    ///
    /// Returns load errors.
    pub fn ready(&mut self) -> Result<Vec<Task>> {
        let tasks = self.store.load_all()?;
        Ok(graph::ready_tasks(&tasks).into_iter().cloned().collect())
    }

    // ========================================================================
    // Dependencies
    // ========================================================================

    /// Make `id` depend on `depends_on`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either task is missing, `Cycle` if the edge
    /// would close a cycle, or any load/append error.
    pub fn add_dependency(&mut self, id: &str, depends_on: &str) -> Result<AddOutcome> {
        let tasks = self.store.load_all()?;
        let task = tasks.get(id).ok_or_else(|| TicketlogError::not_found(id))?;
        if !tasks.contains_key(depends_on) {
            return Err(TicketlogError::not_found(depends_on));
        }

        let outcome = graph::add_dependency(task, depends_on, &tasks)?;
        if let AddOutcome::Added(ref next) = outcome {
            self.store.append(next)?;
            tracing::info!(%id, %depends_on, "added dependency");
        }
        Ok(outcome)
    }

    /// Drop the `id -> depends_on` edge.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is missing, or any load/append error.
    pub fn remove_dependency(&mut self, id: &str, depends_on: &str) -> Result<RemoveOutcome> {
        let mut tasks = self.store.load_all()?;
        let task = take(&mut tasks, id)?;

        let outcome = graph::remove_dependency(&task, depends_on)?;
        if let RemoveOutcome::Removed(ref next) = outcome {
            self.store.append(next)?;
            tracing::info!(%id, %depends_on, "removed dependency");
        }
        Ok(outcome)
    }

    /// What `id` waits on and what waits on it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is missing, or load errors.
    pub fn dependencies(&mut self, id: &str) -> Result<DependencyReport> {
        let tasks = self.store.load_all()?;
        let task = tasks.get(id).ok_or_else(|| TicketlogError::not_found(id))?;
        Ok(graph::dependency_report(task, &tasks))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Rewrite the log without dead history.
    ///
    /// # Errors
    ///
    /// See [`LogStore::compact`].
    pub fn compact(&mut self) -> Result<CompactionReport> {
        self.store.compact()
    }

    /// Import a beads JSONL export.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` for a missing source, or load/append errors.
    pub fn import_beads(&mut self, source: &Path, dry_run: bool) -> Result<ImportReport> {
        let tasks = self.store.load_all()?;
        let mut existing: HashSet<String> = tasks.into_keys().collect();
        let store = &self.store;
        import::import_beads(source, &mut existing, dry_run, |task| store.append(task))
    }

    /// Emit the compaction hint if the last replay crossed the threshold.
    pub fn check_dead_history(&self) -> Option<DeadHistoryWarning> {
        self.store.check_dead_history(self.dead_history_threshold)
    }

    fn save(&self, task: Task) -> Result<Task> {
        self.store.append(&task)?;
        tracing::info!(id = %task.id, status = %task.status, "saved revision");
        Ok(task)
    }
}

fn take(tasks: &mut TaskMap, id: &str) -> Result<Task> {
    tasks.remove(id).ok_or_else(|| TicketlogError::not_found(id))
}
