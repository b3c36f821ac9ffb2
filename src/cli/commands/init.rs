//! Init command implementation.
//!
//! Writes `.ticketlog.toml` at the git root, or in the current directory
//! outside a repository.

use std::fs;
use std::path::Path;

use ticketlog_lib::{Result, TicketlogError};

use crate::cli::{Context, InitArgs};
use crate::config::{CONFIG_FILE_NAME, config_template, derive_prefix, find_git_root};
use crate::format::{InitResult, print_json};

/// Execute the init command.
///
/// # Errors
///
/// Returns `Config` if the file already exists and `--force` was not given,
/// or `Io` if it cannot be written.
pub fn execute(args: &InitArgs, ctx: &Context) -> Result<()> {
    let cwd = dunce::canonicalize(std::env::current_dir()?)?;
    let target_dir = find_git_root(&cwd).unwrap_or(cwd);
    let target_path = target_dir.join(CONFIG_FILE_NAME);

    if target_path.exists() && !args.force {
        let error = "Configuration file already exists";
        if ctx.json {
            print_json(&InitResult {
                success: false,
                path: target_path.clone(),
                prefix: None,
                error: Some(error.to_string()),
            })?;
        }
        return Err(TicketlogError::Config(format!(
            "{error} at {}. Use --force to overwrite.",
            target_path.display()
        )));
    }

    let prefix = args
        .prefix
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| prefix_for(&target_dir));

    fs::write(&target_path, config_template(&prefix))?;
    tracing::info!(path = %target_path.display(), %prefix, "wrote config");

    if ctx.json {
        print_json(&InitResult {
            success: true,
            path: target_path,
            prefix: Some(prefix),
            error: None,
        })?;
    } else {
        println!(
            "Created configuration at {} with prefix \"{prefix}\"",
            target_path.display()
        );
    }
    Ok(())
}

fn prefix_for(dir: &Path) -> String {
    derive_prefix(&dir.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned()))
}
