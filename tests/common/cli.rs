//! Harness for running the `tl` binary against a throwaway project.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// Project directory name inside the temp dir; `init` derives "myc" from it.
pub const PROJECT_DIR: &str = "my-cool-project";

/// A temporary git-rooted project directory.
pub struct TlWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
}

impl TlWorkspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path().join(PROJECT_DIR);
        fs::create_dir_all(root.join(".git")).expect("create fake git dir");
        Self { _temp: temp, root }
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("ticketlog.jsonl")
    }

    pub fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(ToString::to_string)
            .collect()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }
}

/// Captured result of one `tl` invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

/// Build a `tl` command rooted in `cwd` with a clean environment.
pub fn tl_command(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tl").expect("tl binary");
    cmd.current_dir(cwd)
        .env_remove("TICKETLOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `tl` in the workspace root and capture its output.
pub fn run_tl<I, S>(workspace: &TlWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    run_tl_in(&workspace.root, args, label)
}

/// Run `tl` in `cwd` and capture its output.
pub fn run_tl_in<I, S>(cwd: &Path, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = tl_command(cwd)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("[{label}] failed to run tl: {e}"));

    let result = RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] tl exited with {}: {}", result.status, result.stderr);
    }
    result
}

/// Create a task and return its ID.
pub fn create_task(workspace: &TlWorkspace, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["--json", "create", title];
    args.extend_from_slice(extra);
    let out = run_tl(workspace, args, "create");
    assert!(out.status.success(), "create failed: {}", out.stderr);
    out.json()["id"]
        .as_str()
        .expect("created task has an id")
        .to_string()
}
