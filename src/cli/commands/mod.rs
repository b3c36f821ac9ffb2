//! Command implementations, one module per subcommand.

pub mod cancel;
pub mod clean;
pub mod close;
pub mod create;
pub mod dep;
pub mod import;
pub mod init;
pub mod list;
pub mod ready;
pub mod show;
pub mod start;
pub mod update;
pub mod version;

use ticketlog_lib::{BatchOutcome, TaskLog};

/// Report unknown IDs from a batch on stderr; the batch itself still succeeds.
pub(crate) fn report_not_found(outcome: &BatchOutcome) {
    for id in &outcome.not_found {
        eprintln!("Error: Task {id} not found");
    }
}

/// Print a command's human-readable output, then the dead-history hint.
///
/// The hint reaches stderr through the log store's `tracing` warning.
pub(crate) fn print_with_hint(log: &TaskLog, output: &str) {
    println!("{}", output.trim_end_matches('\n'));
    if let Some(warning) = log.check_dead_history() {
        tracing::debug!(
            ratio = warning.ratio,
            threshold = warning.threshold,
            path = %log.path().display(),
            "dead history above threshold"
        );
    }
}
