//! Error types for `ticketlog-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for task log operations.
#[derive(Error, Debug)]
pub enum TicketlogError {
    // === Task Errors ===
    /// Task with the specified ID was not found.
    #[error("Task {id} not found")]
    NotFound { id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Priority could not be parsed or is out of range (0-4).
    #[error("Invalid priority: {value}. Must be 0-4 or P0-P4")]
    InvalidPriority { value: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid task type value.
    #[error("Invalid task type: {task_type}")]
    InvalidType { task_type: String },

    // === Dependency Errors ===
    /// Adding the dependency would create a cycle.
    #[error("Adding dependency {from} -> {to} would create a cycle")]
    Cycle { from: String, to: String },

    // === Log Errors ===
    /// A line of the task log could not be parsed.
    #[error("Log parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// No unused ID could be generated.
    #[error("Could not generate a unique ID with prefix '{prefix}' after {attempts} attempts")]
    Exhausted { prefix: String, attempts: usize },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TicketlogError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// True for errors that batch operations report and skip past.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type using `TicketlogError`.
pub type Result<T> = std::result::Result<T, TicketlogError>;
