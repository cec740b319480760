//! End-to-end tests for the `survey-cli` binary.
#![cfg(feature = "survey-cli")]
use std::process::{Command, Output};

fn survey_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_survey-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("SURVEY_FLOW_CLIENT_ID", "test-client")
        .env("SURVEY_FLOW_CLIENT_SECRET", "test-secret")
        .output()
        .unwrap()
}

#[test]
fn test_plan_json_stdout_is_pure_json() {
    let output = survey_cli(&["plan", "--questions", "1", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tasks"].as_array().unwrap().len(), 5);

    // The "plan built" log line still goes out, on stderr.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plan built"));
}

#[test]
fn test_plan_json_with_save_stays_parseable() {
    let path = std::env::temp_dir().join("survey_cli_plan_test.bin");
    let path = path.to_str().unwrap();
    let output = survey_cli(&["plan", "--json", "--save", path]);
    assert!(output.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok());
    std::fs::remove_file(path).ok();
}

#[test]
fn test_verbose_flag_enables_debug_logs() {
    let quiet = survey_cli(&["publish", "--questions", "2", "--dry-run"]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("DEBUG"));

    let verbose = survey_cli(&["publish", "--questions", "2", "--dry-run", "--verbose"]);
    assert!(verbose.status.success());
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("DEBUG"));
    assert!(!stderr.contains("test-secret"));
}

#[test]
fn test_negative_question_count_exits_with_error() {
    let output = survey_cli(&["plan", "--questions", "-1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}
