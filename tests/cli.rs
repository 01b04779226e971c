//! Integration tests for top-level CLI behavior.

use std::process::Command;

fn run_parlwatch(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_parlwatch");
    Command::new(bin)
        .args(args)
        .env_remove("PARLWATCH_RECORD")
        .output()
        .expect("failed to run parlwatch binary")
}

#[test]
fn help_lists_subcommands() {
    let output = run_parlwatch(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("check"));
    assert!(stdout.contains("single"));
    assert!(stdout.contains("report"));
}

#[test]
fn check_help_shows_filters() {
    let output = run_parlwatch(&["check", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--leg"));
    assert!(stdout.contains("--curr"));
    assert!(stdout.contains("--data-dir"));
}

#[test]
fn current_only_with_term_filter_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap();
    let output = run_parlwatch(&["check", "-c", "-l", "XVII", "-d", data_dir]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("cannot be used with"));
    assert!(!dir.path().join("change-report.json").exists());
}

#[test]
fn report_without_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_parlwatch(&["report", "-d", dir.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("No change report found"));
}

#[test]
fn report_prints_persisted_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("change-report.json"),
        r#"{"Deputados": {"XVII": "https://example.com/a.xml"}}"#,
    )
    .unwrap();

    let output = run_parlwatch(&["report", "-d", dir.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("\"XVII\": \"https://example.com/a.xml\""));
}

#[test]
fn missing_cassette_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("missing.cassette.yaml");
    let output = run_parlwatch(&[
        "check",
        "--replay",
        cassette.to_str().unwrap(),
        "-d",
        dir.path().to_str().unwrap(),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to read cassette file"));
}
