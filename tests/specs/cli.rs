// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary-level smoke tests that don't need tmux: help output, empty
//! listings, and validation exit codes.

use assert_cmd::assert::Assert;
use assert_cmd::Command;

fn daedalos(tmp: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("daedalos").unwrap();
    cmd.env("DAEDALOS_DATA_ROOT", tmp.path().join("data"));
    cmd.env_remove("AGENT_NAME");
    cmd
}

fn stdout_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

#[test]
fn help_lists_the_verbs() {
    let tmp = tempfile::tempdir().unwrap();
    let assert = daedalos(&tmp).arg("--help").assert().success();
    let stdout = stdout_of(&assert);
    for verb in ["spawn", "kill", "signal", "lock", "claim", "workflow", "hook"] {
        assert!(stdout.contains(verb), "help missing {verb}");
    }
}

#[test]
fn list_on_fresh_root_is_empty_and_ok() {
    let tmp = tempfile::tempdir().unwrap();
    let assert = daedalos(&tmp).arg("list").assert().success();
    assert!(stdout_of(&assert).contains("no agents"));
}

#[test]
fn spawn_with_invalid_name_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["spawn", "1bad"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn spawn_with_overlong_name_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let name = "a".repeat(40);
    daedalos(&tmp)
        .args(["spawn", &name])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn send_to_unknown_recipient_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["send", "ghost", "hello"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn workflow_start_with_unknown_workflow_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["workflow", "start", "ghost", "task"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn signal_check_without_signal_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["signal", "check", "w1"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn signal_complete_then_check_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args([
            "signal", "complete", "w1", "--status", "success", "--data", "done",
        ])
        .assert()
        .success();
    let assert = daedalos(&tmp).args(["signal", "check", "w1"]).assert().success();
    assert!(stdout_of(&assert).contains("success"));
}

#[test]
fn lock_acquire_release_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["lock", "acquire", "db", "--owner", "me", "--timeout", "0s"])
        .assert()
        .success();
    daedalos(&tmp)
        .args(["lock", "release", "db", "--owner", "me"])
        .assert()
        .success();
}

#[test]
fn lock_release_by_non_owner_fails() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["lock", "acquire", "db", "--owner", "me", "--timeout", "0s"])
        .assert()
        .success();
    daedalos(&tmp)
        .args(["lock", "release", "db", "--owner", "impostor"])
        .assert()
        .failure();
}

#[test]
fn claim_conflict_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["claim", "create", "task-1", "--agent", "w1"])
        .assert()
        .success();
    daedalos(&tmp)
        .args(["claim", "create", "task-1", "--agent", "w2"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn hook_create_list_disable_cycle() {
    let tmp = tempfile::tempdir().unwrap();
    daedalos(&tmp)
        .args(["hook", "create", "on_spawn", "10-notify"])
        .assert()
        .success();
    let assert = daedalos(&tmp).args(["hook", "list"]).assert().success();
    assert!(stdout_of(&assert).contains("on_spawn/10-notify"));

    daedalos(&tmp)
        .args(["hook", "disable", "on_spawn", "10-notify"])
        .assert()
        .success();
    let assert = daedalos(&tmp).args(["hook", "list"]).assert().success();
    assert!(stdout_of(&assert).contains("(disabled)"));
}
