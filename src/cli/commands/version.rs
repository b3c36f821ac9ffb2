//! Version command implementation.

use ticketlog_lib::Result;

use crate::cli::Context;
use crate::format::{VersionInfo, print_json};

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &Context) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if ctx.json {
        print_json(&VersionInfo { version })?;
    } else {
        println!("ticketlog {version}");
    }
    Ok(())
}
