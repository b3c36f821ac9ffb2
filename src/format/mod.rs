//! Output formatting for `ticketlog`.
//!
//! Human-readable text goes to stdout; `--json` swaps it for pretty-printed
//! JSON. Tasks serialize as their log representation. The remaining JSON
//! payloads are:
//! - [`DependencyList`] - `dep list`
//! - [`CleanSummary`] - `clean`
//! - [`InitResult`] - `init`
//! - [`Message`] - no-op outcomes
//! - [`VersionInfo`] - `version`

mod output;
mod text;

pub use output::{CleanSummary, DependencyList, InitResult, Message, VersionInfo};
pub use text::{
    format_dependency_report, format_import_report, format_priority, format_status_icon,
    format_task_detail, format_task_line, format_task_list, format_type_badge, truncate_title,
};

use serde::Serialize;
use ticketlog_lib::Result;

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
