//! Append-only JSONL task log.
//!
//! Each line is one complete [`Task`] revision. Replaying the file in order
//! and keeping the last line seen for each ID yields the current state.
//! Lines superseded by a later revision are "dead history"; [`LogStore::compact`]
//! rewrites the file without them.
//!
//! Appends are a single `write` on a file opened in append mode and take no
//! lock. Compaction writes a temp file and renames it over the log, so
//! readers never see a partial file, but a record appended by another
//! process between compaction's read and its rename is lost.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use tempfile::Builder;

use crate::error::{Result, TicketlogError};
use crate::model::{Task, TaskMap};

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "ticketlog.jsonl";

/// Line counts from the most recent replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Non-blank lines read.
    pub total_lines: usize,
    /// Distinct task IDs among them.
    pub unique_count: usize,
}

impl LogStats {
    /// Share of lines superseded by a later revision, in `[0, 1)`.
    #[must_use]
    pub fn dead_history_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        (self.total_lines - self.unique_count) as f64 / self.total_lines as f64
    }

    #[must_use]
    pub const fn dead_lines(&self) -> usize {
        self.total_lines - self.unique_count
    }
}

/// Advisory emitted when dead history crosses the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadHistoryWarning {
    pub ratio: f64,
    pub threshold: f64,
}

impl std::fmt::Display for DeadHistoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}% of log lines are dead history (threshold: {:.0}%). Run `tl clean` to compact.",
            self.ratio * 100.0,
            self.threshold * 100.0
        )
    }
}

/// Outcome of [`LogStore::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionReport {
    pub original_lines: usize,
    pub new_lines: usize,
    pub removed_lines: usize,
}

impl CompactionReport {
    /// True if the file was rewritten.
    #[must_use]
    pub const fn rewritten(&self) -> bool {
        self.removed_lines > 0
    }
}

/// Owner of the log file.
///
/// Holds no task cache: every [`LogStore::load_all`] re-reads the file.
/// The dead-history warning fires at most once per store; the CLI builds
/// exactly one store per process, which makes that once per process.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    stats: LogStats,
    warned: OnceCell<DeadHistoryWarning>,
}

impl LogStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stats: LogStats::default(),
            warned: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counts from the last replay (or compaction).
    #[must_use]
    pub const fn stats(&self) -> LogStats {
        self.stats
    }

    #[must_use]
    pub fn dead_history_ratio(&self) -> f64 {
        self.stats.dead_history_ratio()
    }

    /// Append one revision as a single line.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened or written, or `Json` if the
    /// task cannot be serialized.
    pub fn append(&self, task: &Task) -> Result<()> {
        let mut line = serde_json::to_string(task)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        tracing::debug!(id = %task.id, path = %self.path.display(), "appended revision");
        Ok(())
    }

    /// Replay the log into the latest revision per ID.
    ///
    /// A missing file is an empty log.
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the 1-based line number if any line is not
    /// UTF-8, is not a valid task, or has an empty title. Returns `Io` if
    /// the file cannot be read.
    pub fn load_all(&mut self) -> Result<TaskMap> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.stats = LogStats::default();
                return Ok(TaskMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut tasks = TaskMap::new();
        let mut total_lines = 0;

        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw?;
            let line_num = index + 1;
            let line = String::from_utf8(raw).map_err(|e| TicketlogError::Parse {
                line: line_num,
                reason: format!("invalid UTF-8: {}", e.utf8_error()),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            total_lines += 1;

            let task = parse_line(trimmed, line_num)?;
            tasks.insert(task.id.clone(), task);
        }

        self.stats = LogStats {
            total_lines,
            unique_count: tasks.len(),
        };
        tracing::trace!(
            total_lines,
            unique = tasks.len(),
            path = %self.path.display(),
            "replayed log"
        );
        Ok(tasks)
    }

    /// Warn once per store if dead history exceeds `threshold`.
    ///
    /// Returns the warning the first time it fires and `None` afterwards,
    /// including when the ratio is at or below the threshold.
    pub fn check_dead_history(&self, threshold: f64) -> Option<DeadHistoryWarning> {
        let ratio = self.dead_history_ratio();
        if ratio <= threshold || self.warned.get().is_some() {
            return None;
        }

        let warning = DeadHistoryWarning { ratio, threshold };
        self.warned.set(warning).ok()?;
        tracing::warn!("{warning}");
        Some(warning)
    }

    /// Rewrite the log with one line per live task, sorted by ID.
    ///
    /// Skips the rewrite when there is nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns `Parse`/`Io` from the replay, or `Io` if the temp file cannot
    /// be written or renamed. On error the original log is left as it was.
    pub fn compact(&mut self) -> Result<CompactionReport> {
        let tasks = self.load_all()?;
        let before = self.stats;

        let report = CompactionReport {
            original_lines: before.total_lines,
            new_lines: tasks.len(),
            removed_lines: before.dead_lines(),
        };
        if !report.rewritten() {
            return Ok(report);
        }

        replace_with(&self.path, &tasks)?;

        self.stats = LogStats {
            total_lines: tasks.len(),
            unique_count: tasks.len(),
        };
        tracing::info!(
            original = report.original_lines,
            kept = report.new_lines,
            removed = report.removed_lines,
            "compacted log"
        );
        Ok(report)
    }
}

fn parse_line(line: &str, line_num: usize) -> Result<Task> {
    let task: Task = serde_json::from_str(line).map_err(|e| TicketlogError::Parse {
        line: line_num,
        reason: e.to_string(),
    })?;
    if task.title.trim().is_empty() {
        return Err(TicketlogError::Parse {
            line: line_num,
            reason: format!("task {} has an empty title", task.id),
        });
    }
    Ok(task)
}

/// Write `tasks` to a temp file beside `target`, fsync it, and rename it
/// over `target`. On error the temp file is removed and `target` is untouched.
fn replace_with(target: &Path, tasks: &TaskMap) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Dropping the temp file on an early return deletes it.
    let mut tmp = Builder::new().prefix(".ticketlog_tmp_").tempfile_in(&dir)?;
    for task in tasks.values() {
        let json = serde_json::to_string(task)?;
        writeln!(tmp, "{json}")?;
    }
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| TicketlogError::Io(e.error))?;
    Ok(())
}
