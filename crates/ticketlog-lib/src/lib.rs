//! `ticketlog-lib`: append-only task log engine.
//!
//! Tasks live in a JSONL file, one full revision per line. Reading replays
//! the file with last-write-wins per ID; writing appends a new revision.
//! Superseded lines accumulate as dead history until compacted.
//!
//! # Quick Start
//!
//! ```no_run
//! use ticketlog_lib::{ListFilter, NewTask, TaskLog};
//!
//! let mut log = TaskLog::open("ticketlog.jsonl").with_prefix("tl");
//!
//! let task = log.create(NewTask { title: "New task".into(), ..Default::default() }).unwrap();
//! log.start(&task.id, Some("ana".into())).unwrap();
//!
//! let open = log.list(&ListFilter::default()).unwrap();
//! let ready = log.ready().unwrap();
//! # let _ = (open, ready);
//!
//! log.compact().unwrap();
//! ```

pub mod error;
pub mod graph;
pub mod id;
pub mod import;
pub mod log;
pub mod model;
pub mod query;
pub mod task_log;

pub use error::{Result, TicketlogError};
pub use graph::{AddOutcome, DependencyReport, RemoveOutcome, ResolvedDependency};
pub use import::{ImportOutcome, ImportReport, ImportStats};
pub use log::{CompactionReport, DeadHistoryWarning, LogStats, LogStore};
pub use model::{Priority, Status, Task, TaskMap, TaskType};
pub use query::{LabelEdits, ListFilter, NewTask, TaskPatch};
pub use task_log::{BatchOutcome, TaskLog};
