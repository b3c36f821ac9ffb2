//! Command-line interface for `ticketlog`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ticketlog_lib::TaskLog;

use crate::config::Project;
use crate::logging;

/// `ticketlog` (tl) - task tracker backed by an append-only JSONL log.
#[derive(Parser, Debug)]
#[command(name = "tl")]
#[command(
    author,
    version,
    about = "Local task tracker backed by an append-only JSONL log",
    long_about = None,
    after_help = "Tasks are stored in ticketlog.jsonl next to .ticketlog.toml (or in the current directory)."
)]
pub struct Cli {
    /// Output as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Task log file to use instead of the project default
    #[arg(long, global = true, env = "TICKETLOG_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new task
    #[command(visible_aliases = ["new", "add"])]
    Create(CreateArgs),

    /// List tasks
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show task details
    Show(ShowArgs),

    /// Update a task
    Update(UpdateArgs),

    /// Close one or more tasks
    #[command(visible_aliases = ["done", "rm"])]
    Close(CloseArgs),

    /// Cancel one or more tasks (close with a cancel note)
    Cancel(CancelArgs),

    /// Show tasks ready to work on
    Ready,

    /// Start working on a task (set status to in_progress)
    Start(StartArgs),

    /// Manage task dependencies
    Dep(DepCommand),

    /// Add a dependency (task depends on blocker)
    Block(BlockArgs),

    /// Add a dependency (task depends on dependency)
    Depends(DependsArgs),

    /// Remove a dependency
    Unblock(BlockArgs),

    /// Compact the log, keeping only the latest revision of each task
    Clean,

    /// Import tasks from other formats
    Import(ImportCommand),

    /// Initialize a .ticketlog.toml configuration file
    Init(InitArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task title
    pub title: String,

    /// Task type (task, bug, feature, epic, chore)
    #[arg(short = 't', long = "type", default_value = "task")]
    pub type_: String,

    /// Priority (0-4 or P0-P4, 0 = highest)
    #[arg(short, long, default_value = "2")]
    pub priority: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Assignee username
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Comma-separated labels
    #[arg(short, long)]
    pub labels: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter by status (open, in_progress, to_review, closed)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by type
    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    /// Filter by assignee
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Filter by label
    #[arg(short, long)]
    pub label: Option<String>,

    /// Include to_review and closed tasks
    #[arg(short = 'A', long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New status
    #[arg(short, long)]
    pub status: Option<String>,

    /// New type
    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    /// New priority (0-4 or P0-P4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New assignee
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// New notes (replaces existing notes)
    #[arg(long)]
    pub notes: Option<String>,

    /// Add label (can be used multiple times)
    #[arg(long = "add-label")]
    pub add_label: Vec<String>,

    /// Remove label (can be used multiple times)
    #[arg(long = "remove-label")]
    pub remove_label: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Task ID(s) to close
    #[arg(required_unless_present = "review")]
    pub ids: Vec<String>,

    /// Close all tasks in to_review status
    #[arg(long, conflicts_with = "ids")]
    pub review: bool,
}

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Task ID(s) to cancel
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Reason for cancellation
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Task ID
    pub id: String,

    /// Assignee username
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(Args, Debug)]
pub struct DepCommand {
    /// Dependency subcommand
    #[command(subcommand)]
    pub command: DepSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DepSubcommand {
    /// Add a dependency
    Add(DepEdgeArgs),

    /// Remove a dependency
    Remove(DepEdgeArgs),

    /// List dependencies for a task
    List(DepListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DepEdgeArgs {
    /// Task ID that depends on another task
    pub task_id: String,

    /// Task ID that blocks the first task
    pub depends_on_id: String,
}

#[derive(Args, Debug)]
pub struct DepListArgs {
    /// Task ID
    pub task_id: String,
}

#[derive(Args, Debug)]
pub struct BlockArgs {
    /// Task ID that is blocked
    pub task_id: String,

    /// Task ID that blocks it
    pub blocker_id: String,
}

#[derive(Args, Debug)]
pub struct DependsArgs {
    /// Task ID that depends on another
    pub task_id: String,

    /// Task ID it depends on
    pub dependency_id: String,
}

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// Import source format
    #[command(subcommand)]
    pub command: ImportSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ImportSubcommand {
    /// Import from a beads JSONL export
    Beads(ImportBeadsArgs),
}

#[derive(Args, Debug)]
pub struct ImportBeadsArgs {
    /// Path to the beads issues.jsonl file
    pub filepath: PathBuf,

    /// Validate and map every line without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Prefix for task IDs (default: derived from the directory name)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Per-invocation state shared by commands.
#[derive(Debug)]
pub struct Context {
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl Context {
    /// Resolve the project from the current directory and open its log.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unavailable or the
    /// config file is invalid.
    pub fn open_log(&self) -> ticketlog_lib::Result<TaskLog> {
        let cwd = std::env::current_dir()?;
        let project = Project::discover(&cwd)?;
        let log = project.open_log(self.file.as_deref());
        tracing::debug!(path = %log.path().display(), prefix = log.prefix(), "opened task log");
        Ok(log)
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    let ctx = Context {
        json: cli.json,
        file: cli.file,
    };

    match cli.command {
        Commands::Create(args) => commands::create::execute(args, &ctx)?,
        Commands::List(args) => commands::list::execute(&args, &ctx)?,
        Commands::Show(args) => commands::show::execute(&args.id, &ctx)?,
        Commands::Update(args) => commands::update::execute(args, &ctx)?,
        Commands::Close(args) => commands::close::execute(&args, &ctx)?,
        Commands::Cancel(args) => commands::cancel::execute(&args, &ctx)?,
        Commands::Ready => commands::ready::execute(&ctx)?,
        Commands::Start(args) => commands::start::execute(&args, &ctx)?,
        Commands::Dep(dep) => match dep.command {
            DepSubcommand::Add(edge) => commands::dep::add(&edge.task_id, &edge.depends_on_id, &ctx)?,
            DepSubcommand::Remove(edge) => {
                commands::dep::remove(&edge.task_id, &edge.depends_on_id, &ctx)?;
            }
            DepSubcommand::List(args) => commands::dep::list(&args.task_id, &ctx)?,
        },
        Commands::Block(args) => commands::dep::add(&args.task_id, &args.blocker_id, &ctx)?,
        Commands::Depends(args) => commands::dep::add(&args.task_id, &args.dependency_id, &ctx)?,
        Commands::Unblock(args) => commands::dep::remove(&args.task_id, &args.blocker_id, &ctx)?,
        Commands::Clean => commands::clean::execute(&ctx)?,
        Commands::Import(import) => match import.command {
            ImportSubcommand::Beads(args) => commands::import::execute(&args, &ctx)?,
        },
        Commands::Init(args) => commands::init::execute(&args, &ctx)?,
        Commands::Version => commands::version::execute(&ctx)?,
    }

    Ok(())
}
