use std::path::PathBuf;

use serde::Serialize;
use ticketlog_lib::{CompactionReport, DependencyReport};

/// `dep list` JSON payload: IDs only, in both directions.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyList {
    pub task_id: String,
    pub depends_on: Vec<String>,
    pub blocks: Vec<String>,
}

impl From<&DependencyReport> for DependencyList {
    fn from(report: &DependencyReport) -> Self {
        Self {
            task_id: report.task_id.clone(),
            depends_on: report
                .depends_on
                .iter()
                .map(|d| d.id().to_string())
                .collect(),
            blocks: report.blocks.iter().map(|t| t.id.clone()).collect(),
        }
    }
}

/// `clean` JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub original_lines: usize,
    pub new_lines: usize,
    pub removed_lines: usize,
}

impl From<CompactionReport> for CleanSummary {
    fn from(report: CompactionReport) -> Self {
        let message = match (report.original_lines, report.removed_lines) {
            (0, _) => Some("No tasks to clean"),
            (_, 0) => Some("Log already clean"),
            _ => None,
        };
        Self {
            message,
            original_lines: report.original_lines,
            new_lines: report.new_lines,
            removed_lines: report.removed_lines,
        }
    }
}

/// `init` JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct InitResult {
    pub success: bool,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Plain message payload for outcomes that produce no task.
#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    pub message: &'a str,
}

/// `version` JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo<'a> {
    pub version: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_summary_messages() {
        let clean = CleanSummary::from(CompactionReport {
            original_lines: 3,
            new_lines: 3,
            removed_lines: 0,
        });
        let json = serde_json::to_value(&clean).unwrap();
        assert_eq!(json["message"], "Log already clean");
        assert_eq!(json["removed_lines"], 0);

        let rewritten = CleanSummary::from(CompactionReport {
            original_lines: 5,
            new_lines: 2,
            removed_lines: 3,
        });
        let json = serde_json::to_value(&rewritten).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["original_lines"], 5);
    }
}
