use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn applch(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_applch"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env_remove("PERPLEXITY_API_KEY")
        .env_remove("PERPLEXITY_BASE_URL")
        .env("APP_LOG_LEVEL", "error")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .output()
        .expect("applch runs")
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

#[test]
fn any_command_seeds_the_workspace() {
    let dir = TempDir::new().expect("tempdir");

    let output = applch(dir.path(), &["print"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✗ No results found. Run 'applch check' and 'applch arena' first."));
    assert_eq!(
        fs::read_to_string(dir.path().join("data/names.json")).expect("names.json"),
        "[]"
    );
    assert!(dir.path().join("results/arena").is_dir());
    assert!(fs::read_to_string(dir.path().join(".env"))
        .expect(".env")
        .contains("PERPLEXITY_API_KEY=your_key_here"));
}

#[test]
fn bootstrap_reports_progress_as_json_lines() {
    let dir = TempDir::new().expect("tempdir");

    let output = applch(dir.path(), &["--json", "bootstrap", "Jane Doe, John Smith"]);

    assert!(output.status.success());
    let events = json_lines(&output);
    assert!(events
        .iter()
        .any(|e| e["event"] == "item_succeeded" && e["key"] == "Jane Doe"));
    let finished = events.last().expect("events emitted");
    assert_eq!(finished["event"], "batch_finished");
    assert_eq!(finished["summary"]["succeeded"], 2);
    assert!(dir.path().join("data/john-smith").is_dir());
}

#[test]
fn check_without_api_key_fails_per_applicant() {
    let dir = TempDir::new().expect("tempdir");
    let folder = dir.path().join("data/jane-doe");
    fs::create_dir_all(&folder).expect("folder");
    fs::write(folder.join("notes.md"), "# Notes").expect("document");

    let output = applch(dir.path(), &["--json", "check", "Jane Doe"]);

    assert!(output.status.success());
    let failed = json_lines(&output)
        .into_iter()
        .find(|e| e["event"] == "item_failed")
        .expect("item failure reported");
    assert_eq!(failed["key"], "jane-doe");
    assert!(failed["error"]
        .as_str()
        .expect("error text")
        .contains("PERPLEXITY_API_KEY"));
    assert!(!dir.path().join("results/jane-doe.md").exists());
}

#[test]
fn clear_without_a_terminal_is_declined() {
    let dir = TempDir::new().expect("tempdir");
    applch(dir.path(), &["bootstrap", "Jane Doe"]);

    let output = applch(dir.path(), &["clear"]);

    assert!(output.status.success());
    assert!(dir.path().join("data/jane-doe").is_dir());

    let output = applch(dir.path(), &["clear", "--yes"]);
    assert!(output.status.success());
    assert!(!dir.path().join("data/jane-doe").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("data/names.json")).expect("names.json"),
        "[]"
    );
}

#[test]
fn print_shows_a_single_applicant() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("results")).expect("results dir");
    fs::write(
        dir.path().join("results/jane-doe.md"),
        "# Summary\n\nNo concerns.",
    )
    .expect("result");

    let output = applch(dir.path(), &["print", "Jane Doe"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("📄 Jane Doe"));
    assert!(stdout.contains("No concerns."));

    let missing = applch(dir.path(), &["print", "Ann Lee"]);
    assert!(missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stdout)
        .contains("No results found for \"Ann Lee\". Run 'applch check \"Ann Lee\"' first."));
}

#[test]
fn arena_without_results_reports_an_error_notice() {
    let dir = TempDir::new().expect("tempdir");

    let output = applch(dir.path(), &["--json", "arena", "Jane Doe"]);

    assert!(output.status.success());
    let events = json_lines(&output);
    let notice = events
        .iter()
        .find(|e| e["event"] == "notice" && e["level"] == "error")
        .expect("error notice reported");
    assert_eq!(notice["message"], "No results found. Run 'applch check' first.");
    assert!(!dir.path().join("results/arena").read_dir().expect("arena dir").any(|_| true));
}

#[test]
fn check_with_an_empty_roster_is_not_fatal() {
    let dir = TempDir::new().expect("tempdir");

    let output = applch(dir.path(), &["check"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("✗ No names provided via CLI and names.json is empty."));
}
