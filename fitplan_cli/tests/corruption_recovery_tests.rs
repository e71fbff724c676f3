//! Corruption recovery tests for fitplan.
//!
//! These tests verify the system can handle:
//! - Corrupted snapshot files
//! - Snapshots of the wrong shape
//! - Completion ids that no longer match the plan
//! - A state directory that cannot be written

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitplan"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn state_dir(dir: &Path) -> std::path::PathBuf {
    let state = dir.join("data/state");
    fs::create_dir_all(&state).unwrap();
    state
}

const SMALL_PLAN: &str = r#"{
  "programName": "Tiny",
  "description": "One week",
  "weeks": [{
    "weekNumber": 1,
    "focus": "Base",
    "schedule": [
      {"dayName": "Monday", "focus": "Full body", "estimatedDuration": "30 min",
       "exercises": [{"name": "Squat", "sets": 3, "reps": "10", "rest": "60s"}]},
      {"dayName": "Tuesday", "focus": "Rest", "estimatedDuration": "0", "exercises": []},
      {"dayName": "Wednesday", "focus": "Rest", "estimatedDuration": "0", "exercises": []},
      {"dayName": "Thursday", "focus": "Rest", "estimatedDuration": "0", "exercises": []},
      {"dayName": "Friday", "focus": "Rest", "estimatedDuration": "0", "exercises": []},
      {"dayName": "Saturday", "focus": "Rest", "estimatedDuration": "0", "exercises": []},
      {"dayName": "Sunday", "focus": "Rest", "estimatedDuration": "0", "exercises": []}
    ]
  }]
}"#;

#[test]
fn test_corrupted_plan_file() {
    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::write(state.join("plan.json"), "{ invalid json }}}}").unwrap();

    cli(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));
}

#[test]
fn test_corrupted_progress_is_replaced_on_next_write() {
    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::write(state.join("progress.json"), "[{\"date\": \"not a date\"").unwrap();

    cli(temp_dir.path())
        .args(["weigh", "72.5", "--date", "2024-04-01"])
        .assert()
        .success();

    let raw = fs::read_to_string(state.join("progress.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_wrong_shape_logs_ignored() {
    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::write(state.join("workoutLogs.json"), r#"{"logs": 3}"#).unwrap();

    cli(temp_dir.path())
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged yet"));
}

#[test]
fn test_stale_completion_ids_are_dropped() {
    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::write(state.join("plan.json"), SMALL_PLAN).unwrap();
    fs::write(state.join("completedDays.json"), r#"["w0-d0","w5-d2"]"#).unwrap();
    fs::write(
        state.join("completedExercises.json"),
        r#"["w0-d0-ex0","w0-d0-ex4"]"#,
    )
    .unwrap();

    // Toggling w0-d0 off proves it was loaded as complete
    cli(temp_dir.path())
        .args(["toggle-day", "w0-d0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked incomplete"));

    cli(temp_dir.path())
        .args(["toggle-day", "w0-d0"])
        .assert()
        .success();
    let raw = fs::read_to_string(state.join("completedDays.json")).unwrap();
    assert_eq!(raw, r#"["w0-d0"]"#);
}

#[test]
fn test_malformed_completion_ids_fall_back_to_empty() {
    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::write(state.join("plan.json"), SMALL_PLAN).unwrap();
    fs::write(state.join("completedDays.json"), r#"["monday"]"#).unwrap();

    cli(temp_dir.path())
        .args(["toggle-day", "w0-d0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked complete"));
}

#[cfg(unix)]
#[test]
fn test_unwritable_state_does_not_fail_command() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = setup_test_dir();
    let state = state_dir(temp_dir.path());
    fs::set_permissions(&state, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions; nothing to test there
    let canary = state.join("canary");
    if fs::write(&canary, "x").is_ok() {
        let _ = fs::remove_file(&canary);
        fs::set_permissions(&state, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    cli(temp_dir.path())
        .args(["weigh", "70", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 70.0 kg"));

    fs::set_permissions(&state, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(!state.join("progress.json").exists());
}
