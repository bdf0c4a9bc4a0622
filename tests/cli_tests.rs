mod common;

use common::*;
use std::process::Command;

fn cli_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_playwright-suite"))
}

#[test]
fn test_cli_help() {
    let output = cli_command().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Run the browser and API end-to-end suites"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("parse-title"));
    assert!(stdout.contains("sync"));
}

#[test]
fn test_cli_run_help() {
    let output = cli_command().args(["run", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--suite"));
    assert!(stdout.contains("--grep"));
    assert!(stdout.contains("--workers"));
    assert!(stdout.contains("--headed"));
    assert!(stdout.contains("--no-sync"));
}

#[test]
fn test_cli_list_suites() {
    let dir = create_test_dir();
    let output = cli_command()
        .current_dir(dir.path())
        .arg("list")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("google-search-2"));
    assert!(stdout.contains("petstore-positive"));
    assert!(stdout.contains("cases [306542, 306543]"));
}

#[test]
fn test_cli_list_with_grep() {
    let dir = create_test_dir();
    let output = cli_command()
        .current_dir(dir.path())
        .args(["list", "--grep", "Non-existent pet"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("petstore-negative"));
    assert!(!stdout.contains("google-search-2"));
}

#[test]
fn test_cli_parse_title() {
    let dir = create_test_dir();
    let output = cli_command()
        .current_dir(dir.path())
        .args(["parse-title", "[100],[200] renews license"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["100", "200"]);
}

#[test]
fn test_cli_run_unknown_suite() {
    let dir = create_test_dir();
    let output = cli_command()
        .current_dir(dir.path())
        .args(["run", "--suite", "nope", "--no-sync"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown suite 'nope'"));
}

#[test]
fn test_cli_explicit_env_requires_env_config() {
    let dir = create_test_dir();
    let output = cli_command()
        .current_dir(dir.path())
        .args([
            "run",
            "--suite",
            "petstore-negative",
            "--env",
            "QA",
            "--no-sync",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("envConfig.json does not exist"));
}

#[test]
fn test_cli_sync_requires_azure_block() {
    let dir = create_test_dir();
    write_file(dir.path(), "envConfig.json", r#"{ "QA": { "BASE_URL": "https://qa" } }"#);
    let output = cli_command()
        .current_dir(dir.path())
        .args(["sync", "--case", "306542", "--outcome", "passed"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no AzureDevOps block"));
}
