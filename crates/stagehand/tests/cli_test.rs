//! Integration tests for the `stagehand` CLI binary.
//!
//! Argument parsing, completions, and error exit codes, all without a
//! running ProPresenter.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `stagehand` binary with env isolation.
fn stagehand_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stagehand");
    cmd.env("HOME", "/tmp/stagehand-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/stagehand-cli-test-nonexistent")
        .env_remove("STAGEHAND_PROFILE")
        .env_remove("STAGEHAND_HOST")
        .env_remove("STAGEHAND_PORT")
        .env_remove("STAGEHAND_TIMEOUT")
        .env_remove("STAGEHAND_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = stagehand_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_commands() {
    stagehand_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ProPresenter")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("look"))
            .and(predicate::str::contains("timer")),
    );
}

#[test]
fn version_flag() {
    stagehand_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    stagehand_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn completions_zsh() {
    stagehand_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn timer_rejects_unknown_operation() {
    stagehand_cmd()
        .args(["--host", "127.0.0.1", "timer", "Countdown", "pause"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn message_token_needs_equals_sign() {
    stagehand_cmd()
        .args(["--host", "127.0.0.1", "message", "Welcome", "--token", "Name"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("NAME=TEXT"));
}

#[test]
fn watch_rejects_unknown_topic() {
    let output = stagehand_cmd()
        .args(["--host", "127.0.0.1", "--port", "9", "watch", "--topic", "status/nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("status/nope"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn unknown_profile_is_usage_error() {
    let output = stagehand_cmd()
        .args(["--profile", "balcony", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("balcony"));
}

#[test]
fn missing_default_profile_is_usage_error() {
    let output = stagehand_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("'default'"));
}

#[test]
fn profile_from_config_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("stagehand");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"stage\"\n\n[profiles.stage]\nhost = \"127.0.0.1\"\nport = 9\n",
    )
    .unwrap();

    // A resolvable profile gets past configuration and fails on connect.
    let output = stagehand_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["--timeout", "2", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

// ── Connection errors ───────────────────────────────────────────────

#[test]
fn unreachable_host_exits_with_connection_code() {
    let output = stagehand_cmd()
        .args(["--host", "127.0.0.1", "--port", "9", "--timeout", "2", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("ProPresenter"));
}
