//! Query, filter, and patch types for task operations.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Priority, Status, Task, TaskType};

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub task_type: TaskType,
    pub status: Status,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub labels: BTreeSet<String>,
    pub notes: String,
}

/// Fields to change when deriving a new revision.
///
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee: Option<Option<String>>,
    pub notes: Option<String>,
    pub labels: Option<BTreeSet<String>>,
    pub dependencies: Option<Vec<String>>,
}

impl TaskPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.task_type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.notes.is_none()
            && self.labels.is_none()
            && self.dependencies.is_none()
    }
}

/// Label additions and removals applied on top of the current set.
#[derive(Debug, Clone, Default)]
pub struct LabelEdits {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl LabelEdits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// `current` with additions applied, then removals.
    #[must_use]
    pub fn apply(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        let mut labels = current.clone();
        labels.extend(self.add.iter().cloned());
        for label in &self.remove {
            labels.remove(label);
        }
        labels
    }
}

/// Filter options for listing tasks.
///
/// All present filters must match. With no `status` and `all == false`,
/// only open and in-progress tasks are returned.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub task_type: Option<TaskType>,
    pub assignee: Option<String>,
    pub label: Option<String>,
    pub all: bool,
}

impl ListFilter {
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self.status {
            Some(status) if task.status != status => return false,
            None if !self.all && !task.status.is_active() => return false,
            _ => {}
        }

        if self.task_type.is_some_and(|t| t != task.task_type) {
            return false;
        }

        if let Some(ref assignee) = self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }

        if let Some(ref label) = self.label {
            if !task.labels.contains(label) {
                return false;
            }
        }

        true
    }
}

/// Ordering shared by `list` and `ready`: priority ascending, then id.
#[must_use]
pub fn priority_then_id(a: &Task, b: &Task) -> Ordering {
    a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id))
}

/// Sort tasks in display order.
pub fn sort_tasks<T: AsRef<Task>>(tasks: &mut [T]) {
    tasks.sort_by(|a, b| priority_then_id(a.as_ref(), b.as_ref()));
}

/// Apply `filter` to `tasks` and return the matches in display order.
#[must_use]
pub fn filter_tasks<'a, I>(tasks: I, filter: &ListFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut results: Vec<&Task> = tasks.into_iter().filter(|t| filter.matches(t)).collect();
    sort_tasks(&mut results);
    results
}

impl AsRef<Self> for Task {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_task(id: &str, priority: u8, status: Status) -> Task {
        let draft = NewTask {
            title: format!("Task {id}"),
            priority: Priority(priority),
            status,
            ..Default::default()
        };
        Task::create(id, draft).unwrap()
    }

    #[test]
    fn test_sort_priority_then_id() {
        let tasks = [
            make_task("tl-5", 2, Status::Open),
            make_task("tl-9", 0, Status::Open),
            make_task("tl-2", 0, Status::Open),
        ];
        let sorted = filter_tasks(&tasks, &ListFilter::default());
        let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tl-2", "tl-9", "tl-5"]);
    }

    #[test]
    fn test_default_view_hides_review_and_closed() {
        let tasks = [
            make_task("tl-a", 2, Status::Open),
            make_task("tl-b", 2, Status::InProgress),
            make_task("tl-c", 2, Status::ToReview),
            make_task("tl-d", 2, Status::Closed),
        ];
        let ids: Vec<&str> = filter_tasks(&tasks, &ListFilter::default())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tl-a", "tl-b"]);

        let all = ListFilter {
            all: true,
            ..Default::default()
        };
        assert_eq!(filter_tasks(&tasks, &all).len(), 4);

        let closed = ListFilter {
            status: Some(Status::Closed),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_tasks(&tasks, &closed)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tl-d"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut bug = make_task("tl-a", 1, Status::Open);
        bug.task_type = TaskType::Bug;
        bug.assignee = Some("ana".to_string());
        bug.labels.insert("ui".to_string());

        let mut other_bug = make_task("tl-b", 1, Status::Open);
        other_bug.task_type = TaskType::Bug;
        other_bug.assignee = Some("bo".to_string());

        let feature = make_task("tl-c", 1, Status::Open);
        let tasks = [bug, other_bug, feature];

        let filter = ListFilter {
            task_type: Some(TaskType::Bug),
            assignee: Some("ana".to_string()),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_tasks(&tasks, &filter)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tl-a"]);

        let by_label = ListFilter {
            label: Some("ui".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_tasks(&tasks, &by_label).len(), 1);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            notes: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_label_edits_add_then_remove() {
        let current: BTreeSet<String> = ["a", "b"].iter().map(ToString::to_string).collect();
        let edits = LabelEdits {
            add: vec!["c".to_string(), "d".to_string()],
            remove: vec!["a".to_string(), "d".to_string()],
        };
        let applied = edits.apply(&current);
        let labels: Vec<&str> = applied.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_sort_is_total_and_ordered(entries in prop::collection::btree_map("[a-z0-9]{1,4}", 0u8..=4, 0..40)) {
            let mut tasks: Vec<Task> = entries
                .iter()
                .map(|(id, p)| make_task(&format!("tl-{id}"), *p, Status::Open))
                .collect();
            tasks.reverse();
            sort_tasks(&mut tasks);
            for pair in tasks.windows(2) {
                prop_assert_eq!(priority_then_id(&pair[0], &pair[1]), Ordering::Less);
            }
        }
    }
}
