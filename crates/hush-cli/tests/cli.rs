//! End-to-end smoke tests for the hush binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn fails_without_required_arguments() {
    let mut cmd = Command::cargo_bin("hush").unwrap();
    cmd.env_remove("PLUGIN_ACTION");
    cmd.env_remove("PLUGIN_URLS");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--action"));
}

#[test]
fn fails_with_invalid_target_url() {
    let mut cmd = Command::cargo_bin("hush").unwrap();
    cmd.args([
        "--action",
        "create",
        "--urls",
        "not a url",
        "--duration",
        "60",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid target URL"));
}

#[test]
fn fails_create_without_duration() {
    let mut cmd = Command::cargo_bin("hush").unwrap();
    cmd.env_remove("PLUGIN_DURATION");
    cmd.args(["--action", "create", "--urls", "http://127.0.0.1:1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("duration"));
}

#[test]
fn unreachable_target_is_reported_per_url() {
    let mut cmd = Command::cargo_bin("hush").unwrap();
    cmd.args([
        "--action",
        "create",
        "--urls",
        "http://127.0.0.1:1",
        "--duration",
        "60",
        "--comment",
        "smoke test",
    ]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("failed"))
        .stdout(predicate::str::contains("http://127.0.0.1:1"));
}

#[test]
fn json_format_emits_outcomes() {
    let mut cmd = Command::cargo_bin("hush").unwrap();
    cmd.args([
        "--action",
        "delete",
        "--urls",
        "http://127.0.0.1:1",
        "--comment",
        "smoke test",
        "--format",
        "json",
    ]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"outcomes\""));
}
