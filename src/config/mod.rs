//! Configuration management for `ticketlog`.
//!
//! Project settings live in `.ticketlog.toml` under a `[project]` table:
//!
//! ```toml
//! [project]
//! prefix = "myc"
//! dead_history_threshold = 0.3
//! ```
//!
//! The file is found by walking up from the current directory, stopping at
//! the git root (or the filesystem root outside a repository). The task log
//! sits next to the config file, or in the current directory when there is
//! no config.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use ticketlog_lib::log::DEFAULT_LOG_FILE;
use ticketlog_lib::task_log::{DEFAULT_DEAD_HISTORY_THRESHOLD, DEFAULT_PREFIX};
use ticketlog_lib::{Result, TaskLog, TicketlogError};

/// Config file name searched for in each directory.
pub const CONFIG_FILE_NAME: &str = ".ticketlog.toml";

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"));

/// Effective project settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prefix: String,
    pub dead_history_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            dead_history_threshold: DEFAULT_DEAD_HISTORY_THRESHOLD,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    project: ProjectTable,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectTable {
    prefix: Option<String>,
    dead_history_threshold: Option<f64>,
}

impl Config {
    /// Parse a config file. Keys that are absent keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file is not valid TOML, the prefix is empty,
    /// or the threshold is outside `[0, 1]`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents).map_err(|e| match e {
            TicketlogError::Config(msg) => {
                TicketlogError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse config text.
    ///
    /// # Errors
    ///
    /// See [`Config::from_file`].
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| TicketlogError::Config(e.to_string()))?;
        let defaults = Self::default();

        let prefix = file.project.prefix.unwrap_or(defaults.prefix);
        if prefix.trim().is_empty() {
            return Err(TicketlogError::Config("prefix cannot be empty".to_string()));
        }

        let dead_history_threshold = file
            .project
            .dead_history_threshold
            .unwrap_or(defaults.dead_history_threshold);
        if !(0.0..=1.0).contains(&dead_history_threshold) {
            return Err(TicketlogError::Config(format!(
                "dead_history_threshold must be between 0.0 and 1.0, got {dead_history_threshold}"
            )));
        }

        Ok(Self {
            prefix,
            dead_history_threshold,
        })
    }
}

/// The resolved project: where its config came from and where its log is.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory holding the log file.
    pub root: PathBuf,
    /// Config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub config: Config,
}

impl Project {
    /// Resolve the project for `start`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a config file was found but is invalid.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = dunce::canonicalize(start)?;
        match find_config_file(&start) {
            Some(path) => {
                let config = Config::from_file(&path)?;
                let root = path.parent().map_or_else(|| start.clone(), Path::to_path_buf);
                tracing::debug!(path = %path.display(), prefix = %config.prefix, "loaded config");
                Ok(Self {
                    root,
                    config_path: Some(path),
                    config,
                })
            }
            None => {
                tracing::debug!(start = %start.display(), "no config file found, using defaults");
                Ok(Self {
                    root: start,
                    config_path: None,
                    config: Config::default(),
                })
            }
        }
    }

    /// Log file path, honouring an explicit override.
    #[must_use]
    pub fn log_path(&self, file_override: Option<&Path>) -> PathBuf {
        file_override.map_or_else(|| self.root.join(DEFAULT_LOG_FILE), Path::to_path_buf)
    }

    /// Open the task log with this project's settings.
    #[must_use]
    pub fn open_log(&self, file_override: Option<&Path>) -> TaskLog {
        TaskLog::open(self.log_path(file_override))
            .with_prefix(self.config.prefix.clone())
            .with_dead_history_threshold(self.config.dead_history_threshold)
    }
}

/// Walk up from `start` looking for [`CONFIG_FILE_NAME`].
///
/// The search includes the git root but does not go above it.
#[must_use]
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let git_root = find_git_root(start);
    let mut current = Some(start);

    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if git_root.as_deref() == Some(dir) {
            break;
        }
        current = dir.parent();
    }
    None
}

/// Nearest ancestor of `start` (inclusive) containing `.git`.
#[must_use]
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Derive an ID prefix from a directory name.
///
/// Keeps ASCII letters and digits, lowercases them, and takes the first
/// three; names with fewer than three such characters get the default.
#[must_use]
pub fn derive_prefix(dir_name: &str) -> String {
    let cleaned = NON_ALNUM.replace_all(dir_name, "").to_lowercase();
    if cleaned.len() >= 3 {
        cleaned[..3].to_string()
    } else {
        DEFAULT_PREFIX.to_string()
    }
}

/// Config file contents written by `tl init`.
#[must_use]
pub fn config_template(prefix: &str) -> String {
    format!(
        r#"# Ticketlog Configuration

[project]
# Prefix for ticket IDs (auto-generated from directory name)
# New tickets will have format: {{prefix}}-{{3-character-random-id}}
# Example: myc-a3f, tic-x9k
prefix = "{prefix}"

# Warn when dead history exceeds this ratio (0.0 to 1.0)
# dead_history_threshold = {DEFAULT_DEAD_HISTORY_THRESHOLD}
"#
    )
}
