mod common;
use common::cli::{TlWorkspace, create_task, run_tl};

#[test]
fn test_dead_history_hint_and_clean() {
    let workspace = TlWorkspace::new();
    let id = create_task(&workspace, "Churn", &[]);
    for n in 0..3 {
        let title = format!("Churn {n}");
        run_tl(&workspace, ["update", &id, "--title", &title], "update");
    }
    assert_eq!(workspace.log_lines().len(), 4);

    let list = run_tl(&workspace, ["list"], "list");
    assert!(list.status.success());
    assert!(list.stderr.contains("75.0% of log lines are dead history"));
    assert!(list.stderr.contains("tl clean"));

    // JSON output skips the hint
    let json_list = run_tl(&workspace, ["--json", "list"], "json_list");
    assert!(!json_list.stderr.contains("dead history"));

    let clean = run_tl(&workspace, ["--json", "clean"], "clean").json();
    assert_eq!(clean["original_lines"], 4);
    assert_eq!(clean["new_lines"], 1);
    assert_eq!(clean["removed_lines"], 3);
    assert_eq!(workspace.log_lines().len(), 1);

    let task = run_tl(&workspace, ["--json", "show", &id], "show").json();
    assert_eq!(task["title"], "Churn 2");

    let again = run_tl(&workspace, ["clean"], "clean_again");
    assert!(again.stdout.contains("Log already clean: 1 lines"));

    let quiet = run_tl(&workspace, ["list"], "list_after");
    assert!(!quiet.stderr.contains("dead history"));
}

#[test]
fn test_every_reader_prints_output_and_hint() {
    let workspace = TlWorkspace::new();
    let id = create_task(&workspace, "Churn", &[]);
    for n in 0..3 {
        let title = format!("Churn {n}");
        run_tl(&workspace, ["update", &id, "--title", &title], "update");
    }

    let show = run_tl(&workspace, ["show", &id], "show");
    assert!(show.stdout.starts_with(&format!("{id}: Churn 2\n")));
    assert!(!show.stdout.ends_with("\n\n"));
    assert!(show.stderr.contains("dead history"));

    let ready = run_tl(&workspace, ["ready"], "ready");
    assert!(ready.stdout.contains(&id));
    assert!(ready.stderr.contains("dead history"));

    let start = run_tl(&workspace, ["start", &id], "start");
    assert_eq!(start.stdout, format!("Started task {id}\n"));
    assert_eq!(start.stderr.matches("dead history").count(), 1);
}

#[test]
fn test_clean_empty_log() {
    let workspace = TlWorkspace::new();
    let out = run_tl(&workspace, ["clean"], "clean");
    assert!(out.status.success());
    assert!(out.stdout.contains("No tasks to clean"));
    assert!(!workspace.log_path().exists());
}

#[test]
fn test_threshold_from_config() {
    let workspace = TlWorkspace::new();
    workspace.write(
        ".ticketlog.toml",
        "[project]\nprefix = \"abc\"\ndead_history_threshold = 0.9\n",
    );
    let id = create_task(&workspace, "Churn", &[]);
    assert!(id.starts_with("abc-"));
    run_tl(&workspace, ["start", &id], "start");

    // 50% dead history is under the configured 90%
    let list = run_tl(&workspace, ["list"], "list");
    assert!(!list.stderr.contains("dead history"));
}

#[test]
fn test_malformed_line_reports_line_number() {
    let workspace = TlWorkspace::new();
    create_task(&workspace, "Fine", &[]);
    let mut contents = std::fs::read_to_string(workspace.log_path()).unwrap();
    contents.push_str("\n{broken\n");
    std::fs::write(workspace.log_path(), contents).unwrap();

    let list = run_tl(&workspace, ["list"], "list");
    assert_eq!(list.status.code(), Some(1));
    assert!(list.stderr.contains("line 3"));
}
