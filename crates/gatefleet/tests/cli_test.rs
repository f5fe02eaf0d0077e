//! Integration tests for the `gatefleet` CLI binary.
//!
//! Every command runs against a throwaway data directory; no device has
//! to be reachable.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `gatefleet` binary with env isolation.
///
/// Clears all `GATEFLEET_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn gatefleet_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gatefleet");
    cmd.env("HOME", "/tmp/gatefleet-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/gatefleet-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/gatefleet-cli-test-nonexistent")
        .env_remove("GATEFLEET_DATA_DIR")
        .env_remove("GATEFLEET_OUTPUT")
        .env_remove("GATEFLEET_BIND")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`gatefleet_cmd`], with `--data-dir` pointing into `dir`.
fn with_data(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = gatefleet_cmd();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = gatefleet_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    gatefleet_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("gate devices")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("serve")),
    );
}

#[test]
fn test_version_flag() {
    gatefleet_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gatefleet"));
}

#[test]
fn test_completions_bash() {
    gatefleet_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gatefleet"));
}

#[test]
fn test_config_path() {
    gatefleet_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_sync_requires_a_target() {
    gatefleet_cmd().arg("sync").assert().code(2);
}

// ── Snapshot-backed commands ────────────────────────────────────────

#[test]
fn test_empty_registry_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let output = with_data(&dir)
        .args(["devices", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(json_stdout(&output), Value::Array(vec![]));
    assert!(dir.path().join("devices.json").exists());
}

#[test]
fn test_unreachable_device_is_registered() {
    let dir = TempDir::new().unwrap();
    let output = with_data(&dir)
        .args([
            "devices",
            "add",
            "--name",
            "Main gate",
            "--endpoint",
            "127.0.0.1:1",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let device = json_stdout(&output);
    assert_eq!(device["connected"], false);
    assert_eq!(device["endpoint"], "http://127.0.0.1:1");

    with_data(&dir)
        .args(["devices", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(device["id"].as_str().unwrap()));
}

#[test]
fn test_unknown_device_exits_not_found() {
    let dir = TempDir::new().unwrap();
    with_data(&dir)
        .args(["devices", "get", "device_missing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_users_round_trip_through_snapshots() {
    let dir = TempDir::new().unwrap();
    with_data(&dir)
        .args(["users", "add", "A1B2", "--name", "Alice", "--type", "static"])
        .assert()
        .success();

    with_data(&dir)
        .args(["users", "credit", "A1B2", "-500"])
        .assert()
        .success();

    let output = with_data(&dir)
        .args(["users", "list", "-o", "json"])
        .output()
        .unwrap();
    let users = json_stdout(&output);
    assert_eq!(users[0]["uid"], "A1B2");
    assert_eq!(users[0]["type"], "STATIC");
    assert_eq!(users[0]["credit"], 99_500);
}

#[test]
fn test_duplicate_user_exits_conflict() {
    let dir = TempDir::new().unwrap();
    with_data(&dir)
        .args(["users", "add", "C3", "--name", "Carol"])
        .assert()
        .success();
    with_data(&dir)
        .args(["users", "add", "C3", "--name", "Carol"])
        .assert()
        .code(6);
}

#[test]
fn test_remove_without_yes_is_refused_non_interactively() {
    let dir = TempDir::new().unwrap();
    with_data(&dir)
        .args(["users", "add", "D4", "--name", "Dan"])
        .assert()
        .success();
    with_data(&dir)
        .args(["users", "remove", "D4"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
    with_data(&dir)
        .args(["users", "remove", "D4", "--yes"])
        .assert()
        .success();
}

#[test]
fn test_settings_set_and_show() {
    let dir = TempDir::new().unwrap();
    with_data(&dir)
        .args(["settings", "set", "--cost-per-exit", "2500"])
        .assert()
        .success();
    let output = with_data(&dir)
        .args(["settings", "show", "-o", "json"])
        .output()
        .unwrap();
    let settings = json_stdout(&output);
    assert_eq!(settings["costPerExit"], 2500);
    assert_eq!(settings["defaultCredit"], 100_000);
}
