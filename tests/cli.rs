//! End-to-end tests driving the `logsift` binary.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const SAMPLE_LOG: &str = "\
2023-09-04 10:00:00 INFO User login successful
2023-09-04 10:05:00 [WARNING] error rate high
2023-09-04 10:10:00 ERROR Database connection failed
2023-09-04 10:15:00 INFO Backup completed successfully
2023-09-04 10:20:00 [fatal] Invalid user input
";

fn logsift(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("logsift").unwrap();
    cmd.current_dir(workdir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("LOG_FILE_PATH")
        .env_remove("LOGSIFT_LOGS_DIR")
        .env_remove("LOGSIFT_OUTPUT_DIR")
        .env_remove("LOGSIFT_CONTEXT_WINDOW")
        .env_remove("LOGSIFT_NO_LLM")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .args(["--config", "/nonexistent/logsift.toml", "--yes"]);
    cmd
}

fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();
    fs::write(dir.path().join("logs").join("app.txt"), SAMPLE_LOG).unwrap();
    dir
}

#[test]
fn missing_file_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    let assert = logsift(dir.path())
        .arg("does-not-exist.txt")
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("log file not found"));
    assert!(!out.exists());
}

#[test]
fn writes_all_formats_from_newest_log() {
    let dir = workspace();
    let out = dir.path().join("out");

    logsift(dir.path())
        .args(["--no-llm", "-w", "1", "-o"])
        .arg(&out)
        .assert()
        .success();

    let json = fs::read_to_string(out.join("error_analysis.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["total_errors_found"], 2);
    assert_eq!(parsed["errors"][0]["line_number"], 3);
    assert_eq!(parsed["errors"][0]["timestamp"], "2023-09-04 10:10:00");
    assert_eq!(parsed["errors"][0]["context_before"][0]["line_number"], 2);
    assert_eq!(parsed["errors"][1]["context_after"].as_array().unwrap().len(), 0);

    let csv = fs::read_to_string(out.join("error_analysis.csv")).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let text = fs::read_to_string(out.join("llm_input.txt")).unwrap();
    assert!(text.contains("Total errors found: 2"));
    assert!(text.contains("Error #2 (Line 5)"));

    assert!(!out.join("gemini_analysis.txt").exists());
}

#[test]
fn selected_formats_only() {
    let dir = workspace();
    let out = dir.path().join("out");

    logsift(dir.path())
        .args(["logs/app.txt", "--no-llm", "-f", "csv", "-o"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("error_analysis.csv").exists());
    assert!(!out.join("error_analysis.json").exists());
    assert!(!out.join("llm_input.txt").exists());
}

#[test]
fn mock_llm_writes_analysis_file() {
    let dir = workspace();
    let out = dir.path().join("out");

    logsift(dir.path())
        .args(["-q", "--report", "-o"])
        .arg(&out)
        .assert()
        .success();

    let analysis = fs::read_to_string(out.join("gemini_analysis.txt")).unwrap();
    assert!(analysis.starts_with("Gemini Log Analysis\n"));
    assert!(analysis.contains("ERROR Database connection failed"));

    let report = fs::read_to_string(out.join("report.txt")).unwrap();
    assert!(report.contains("Total Lines: 5"));
}

#[test]
fn json_flag_prints_result() {
    let dir = workspace();
    let out = dir.path().join("out");

    let assert = logsift(dir.path())
        .args(["--json", "--no-llm", "-o"])
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_errors_found"], 2);
}

#[test]
fn empty_logs_dir_reports_and_returns() {
    let dir = tempdir().unwrap();

    let assert = logsift(dir.path()).arg("--no-llm").assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("No .txt log files found"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn unsupported_format_rejected_by_cli() {
    let dir = workspace();
    logsift(dir.path()).args(["-f", "xml"]).assert().failure();
}

#[test]
fn failed_write_leaves_no_outputs() {
    let dir = workspace();
    let out = dir.path().join("out");
    // A directory in place of the CSV file makes that write fail
    fs::create_dir_all(out.join("error_analysis.csv")).unwrap();

    let assert = logsift(dir.path())
        .args(["--no-llm", "--report", "-o"])
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("processing error"));
    assert!(!out.join("error_analysis.json").exists());
    assert!(!out.join("llm_input.txt").exists());
    assert!(!out.join("report.txt").exists());
    assert!(out.join("error_analysis.csv").is_dir());

    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "error_analysis.csv")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn empty_llm_response_skips_analysis_file() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();
    fs::write(dir.path().join("logs").join("app.txt"), "").unwrap();
    let out = dir.path().join("out");

    logsift(dir.path())
        .args(["-q", "-o"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("error_analysis.json").exists());
    assert!(!out.join("gemini_analysis.txt").exists());
}
