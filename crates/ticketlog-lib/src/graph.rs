//! Dependency graph over live tasks.
//!
//! An edge `a -> b` means "a depends on b" (b blocks a). Edges live in each
//! task's `dependencies` list; the graph is rebuilt from the task map on
//! every call.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TicketlogError};
use crate::model::{Status, Task, TaskMap};
use crate::query::{TaskPatch, sort_tasks};

/// Result of asking for a new edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The new revision carrying the edge; the caller appends it.
    Added(Task),
    AlreadyExists,
}

/// Result of asking to drop an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The new revision without the edge; the caller appends it.
    Removed(Task),
    DoesNotExist,
}

/// A dependency of a task, resolved against the live task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDependency {
    Found(Task),
    NotFound(String),
}

impl ResolvedDependency {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Found(task) => &task.id,
            Self::NotFound(id) => id,
        }
    }
}

/// Both directions of the dependency relation for one task.
#[derive(Debug, Clone)]
pub struct DependencyReport {
    pub task_id: String,
    /// What this task waits on, in the task's own order.
    pub depends_on: Vec<ResolvedDependency>,
    /// Tasks waiting on this one.
    pub blocks: Vec<Task>,
}

/// Check whether adding `task_id -> depends_on_id` would close a cycle.
///
/// Depth-first search from `task_id` over the graph with the candidate edge
/// added; reaching a node still on the search stack is a back-edge.
#[must_use]
pub fn would_create_cycle<'a>(task_id: &'a str, depends_on_id: &'a str, tasks: &'a TaskMap) -> bool {
    let mut adjacency: HashMap<&str, Vec<&str>> = tasks
        .values()
        .map(|t| (t.id.as_str(), t.dependencies.iter().map(String::as_str).collect()))
        .collect();
    adjacency.entry(task_id).or_default().push(depends_on_id);

    let mut visited: HashSet<&str> = HashSet::from([task_id]);
    let mut on_stack: HashSet<&str> = HashSet::from([task_id]);
    // (node, index of the next neighbour to visit)
    let mut stack: Vec<(&str, usize)> = vec![(task_id, 0)];

    while let Some(&(node, next)) = stack.last() {
        let neighbours = adjacency.get(node).map_or(&[][..], Vec::as_slice);
        let Some(&neighbour) = neighbours.get(next) else {
            on_stack.remove(node);
            stack.pop();
            continue;
        };

        if let Some(top) = stack.last_mut() {
            top.1 += 1;
        }
        if on_stack.contains(neighbour) {
            tracing::debug!(from = task_id, to = depends_on_id, via = neighbour, "cycle found");
            return true;
        }
        if visited.insert(neighbour) {
            on_stack.insert(neighbour);
            stack.push((neighbour, 0));
        }
    }

    false
}

/// Derive a revision of `task` that also depends on `depends_on_id`.
///
/// # Errors
///
/// Returns `Cycle` if the edge would create a cycle; nothing is derived.
pub fn add_dependency(task: &Task, depends_on_id: &str, tasks: &TaskMap) -> Result<AddOutcome> {
    if task.depends_on(depends_on_id) {
        return Ok(AddOutcome::AlreadyExists);
    }
    if would_create_cycle(&task.id, depends_on_id, tasks) {
        return Err(TicketlogError::Cycle {
            from: task.id.clone(),
            to: depends_on_id.to_string(),
        });
    }

    let mut dependencies = task.dependencies.clone();
    dependencies.push(depends_on_id.to_string());
    let patch = TaskPatch {
        dependencies: Some(dependencies),
        ..Default::default()
    };
    Ok(AddOutcome::Added(task.with_updates(&patch)?))
}

/// Derive a revision of `task` that no longer depends on `depends_on_id`.
///
/// # Errors
///
/// Propagates revision errors from [`Task::with_updates`].
pub fn remove_dependency(task: &Task, depends_on_id: &str) -> Result<RemoveOutcome> {
    if !task.depends_on(depends_on_id) {
        return Ok(RemoveOutcome::DoesNotExist);
    }

    let patch = TaskPatch {
        dependencies: Some(
            task.dependencies
                .iter()
                .filter(|d| *d != depends_on_id)
                .cloned()
                .collect(),
        ),
        ..Default::default()
    };
    Ok(RemoveOutcome::Removed(task.with_updates(&patch)?))
}

/// Open tasks whose every dependency is a known, closed task.
///
/// A dependency on an unknown ID keeps the task out of the list.
#[must_use]
pub fn ready_tasks(tasks: &TaskMap) -> Vec<&Task> {
    let mut ready: Vec<&Task> = tasks
        .values()
        .filter(|t| t.status == Status::Open)
        .filter(|t| {
            t.dependencies
                .iter()
                .all(|dep| tasks.get(dep).is_some_and(|d| d.status == Status::Closed))
        })
        .collect();
    sort_tasks(&mut ready);
    ready
}

/// Tasks that list `task_id` among their dependencies, ordered by ID.
#[must_use]
pub fn blocked_by<'a>(task_id: &str, tasks: &'a TaskMap) -> Vec<&'a Task> {
    tasks.values().filter(|t| t.depends_on(task_id)).collect()
}

/// Build the `dep list` view for `task`.
#[must_use]
pub fn dependency_report(task: &Task, tasks: &TaskMap) -> DependencyReport {
    let depends_on = task
        .dependencies
        .iter()
        .map(|id| {
            tasks.get(id).map_or_else(
                || ResolvedDependency::NotFound(id.clone()),
                |t| ResolvedDependency::Found(t.clone()),
            )
        })
        .collect();

    DependencyReport {
        task_id: task.id.clone(),
        depends_on,
        blocks: blocked_by(&task.id, tasks).into_iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::NewTask;
    use proptest::prelude::*;

    fn make_task(id: &str, status: Status, deps: &[&str]) -> Task {
        let draft = NewTask {
            title: format!("Task {id}"),
            status,
            ..Default::default()
        };
        let mut task = Task::create(id, draft).unwrap();
        task.dependencies = deps.iter().map(ToString::to_string).collect();
        task
    }

    fn map(tasks: Vec<Task>) -> TaskMap {
        tasks.into_iter().map(|t| (t.id.clone(), t)).collect()
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let tasks = map(vec![make_task("tl-a", Status::Open, &[])]);
        assert!(would_create_cycle("tl-a", "tl-a", &tasks));
    }

    #[test]
    fn test_reverse_edge_is_cycle() {
        let tasks = map(vec![
            make_task("tl-a", Status::Open, &["tl-b"]),
            make_task("tl-b", Status::Open, &[]),
        ]);
        assert!(would_create_cycle("tl-b", "tl-a", &tasks));
        assert!(!would_create_cycle("tl-a", "tl-b", &tasks));
    }

    #[test]
    fn test_transitive_cycle() {
        let tasks = map(vec![
            make_task("tl-a", Status::Open, &["tl-b"]),
            make_task("tl-b", Status::Open, &["tl-c"]),
            make_task("tl-c", Status::Open, &[]),
        ]);
        assert!(would_create_cycle("tl-c", "tl-a", &tasks));
        assert!(!would_create_cycle("tl-a", "tl-c", &tasks));
    }

    #[test]
    fn test_diamond_is_not_cycle() {
        let tasks = map(vec![
            make_task("tl-a", Status::Open, &["tl-b", "tl-c"]),
            make_task("tl-b", Status::Open, &["tl-d"]),
            make_task("tl-c", Status::Open, &["tl-d"]),
            make_task("tl-d", Status::Open, &[]),
        ]);
        assert!(!would_create_cycle("tl-b", "tl-c", &tasks));
    }

    #[test]
    fn test_unknown_ids_have_empty_adjacency() {
        let tasks = map(vec![make_task("tl-a", Status::Open, &["tl-zzz"])]);
        assert!(!would_create_cycle("tl-new", "tl-a", &tasks));
        assert!(!would_create_cycle("tl-a", "tl-ghost", &tasks));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n = 20_000;
        let tasks: TaskMap = (0..n)
            .map(|i| {
                let deps = if i + 1 < n {
                    vec![format!("tl-{}", i + 1)]
                } else {
                    vec![]
                };
                let mut t = make_task(&format!("tl-{i}"), Status::Open, &[]);
                t.dependencies = deps;
                (t.id.clone(), t)
            })
            .collect();
        let last = format!("tl-{}", n - 1);
        assert!(would_create_cycle(&last, "tl-0", &tasks));
    }

    #[test]
    fn test_add_dependency_outcomes() {
        let tasks = map(vec![
            make_task("tl-a", Status::Open, &["tl-b"]),
            make_task("tl-b", Status::Open, &[]),
            make_task("tl-c", Status::Open, &[]),
        ]);

        let a = &tasks["tl-a"];
        assert_eq!(
            add_dependency(a, "tl-b", &tasks).unwrap(),
            AddOutcome::AlreadyExists
        );

        let AddOutcome::Added(next) = add_dependency(a, "tl-c", &tasks).unwrap() else {
            panic!("expected a new revision");
        };
        assert_eq!(next.dependencies, vec!["tl-b", "tl-c"]);
        assert_eq!(a.dependencies, vec!["tl-b"]);

        let b = &tasks["tl-b"];
        let err = add_dependency(b, "tl-a", &tasks).unwrap_err();
        assert!(matches!(err, TicketlogError::Cycle { .. }));
    }

    #[test]
    fn test_remove_dependency_outcomes() {
        let task = make_task("tl-a", Status::Open, &["tl-b", "tl-c"]);
        let RemoveOutcome::Removed(next) = remove_dependency(&task, "tl-b").unwrap() else {
            panic!("expected a new revision");
        };
        assert_eq!(next.dependencies, vec!["tl-c"]);
        assert_eq!(
            remove_dependency(&task, "tl-x").unwrap(),
            RemoveOutcome::DoesNotExist
        );
    }

    #[test]
    fn test_ready_requires_closed_known_dependencies() {
        let tasks = map(vec![
            make_task("tl-1", Status::Open, &[]),
            make_task("tl-2", Status::Open, &["tl-3"]),
            make_task("tl-3", Status::Closed, &[]),
            make_task("tl-4", Status::Open, &["tl-1"]),
            make_task("tl-5", Status::Open, &["tl-999"]),
            make_task("tl-6", Status::InProgress, &[]),
        ]);
        let ids: Vec<&str> = ready_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tl-1", "tl-2"]);
    }

    #[test]
    fn test_blocked_by_and_report() {
        let tasks = map(vec![
            make_task("tl-a", Status::Open, &["tl-c", "tl-404"]),
            make_task("tl-b", Status::Open, &["tl-c"]),
            make_task("tl-c", Status::Open, &[]),
        ]);
        let blocked: Vec<&str> = blocked_by("tl-c", &tasks)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(blocked, vec!["tl-a", "tl-b"]);

        let report = dependency_report(&tasks["tl-a"], &tasks);
        assert!(matches!(report.depends_on[0], ResolvedDependency::Found(ref t) if t.id == "tl-c"));
        assert_eq!(
            report.depends_on[1],
            ResolvedDependency::NotFound("tl-404".to_string())
        );
        assert!(report.blocks.is_empty());
    }

    proptest! {
        // Edges only ever point from a lower index to a higher one, so the
        // graph is acyclic and reachability is easy to compute directly.
        #[test]
        fn prop_cycle_iff_reachable(
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..20),
            from in 0usize..8,
            to in 0usize..8,
        ) {
            let mut deps: Vec<Vec<usize>> = vec![Vec::new(); 8];
            for (a, b) in edges {
                if a < b && !deps[a].contains(&b) {
                    deps[a].push(b);
                }
            }
            let tasks: TaskMap = (0..8)
                .map(|i| {
                    let mut t = make_task(&format!("tl-{i}"), Status::Open, &[]);
                    t.dependencies = deps[i].iter().map(|d| format!("tl-{d}")).collect();
                    (t.id.clone(), t)
                })
                .collect();

            let mut reachable = vec![false; 8];
            let mut stack = vec![to];
            while let Some(n) = stack.pop() {
                if !reachable[n] {
                    reachable[n] = true;
                    stack.extend(deps[n].iter().copied());
                }
            }

            let a = format!("tl-{from}");
            let b = format!("tl-{to}");
            prop_assert_eq!(would_create_cycle(&a, &b, &tasks), reachable[from]);
        }
    }
}
