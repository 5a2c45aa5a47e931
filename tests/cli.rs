//! Runs the compiled `assh` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn assh() -> Command {
    let mut cmd = Command::cargo_bin("assh").unwrap();
    cmd.env_remove("ASSH_DEBUG").env_remove("ASSH_CONFIG");
    cmd
}

#[test]
fn version_includes_revision_marker() {
    assh()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains(" ("));
}

#[test]
fn help_lists_global_flags_and_children() {
    let assert = assh().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for needle in [
        "--config", "--debug", "--verbose", "--help", "-c", "-D", "-V", "ping", "proxy", "info",
        "config", "sockets", "wrapper", "print usage",
    ] {
        assert!(out.contains(needle), "missing {needle} in:\n{out}");
    }
}

#[test]
fn info_reports_defaults() {
    assh()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Debug mode: false"))
        .stdout(predicate::str::contains("Verbose mode: false"))
        .stdout(predicate::str::contains("Config file: ~/.assh.yml"))
        .stdout(predicate::str::contains("CLI path: /"));
}

#[test]
fn info_honors_env_bindings() {
    assh()
        .arg("info")
        .env("ASSH_CONFIG", "/etc/assh.yml")
        .env("ASSH_DEBUG", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file: /etc/assh.yml"))
        .stdout(predicate::str::contains("Debug mode: true"));
}

#[test]
fn global_flags_after_child() {
    assh()
        .args(["info", "-c", "/tmp/other.yml", "-V"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file: /tmp/other.yml"))
        .stdout(predicate::str::contains("Verbose mode: true"));
}

#[test]
fn bad_debug_env_fails_before_dispatch() {
    assh()
        .arg("info")
        .env("ASSH_DEBUG", "definitely")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ASSH_DEBUG"));
}

#[test]
fn missing_external_child_fails() {
    assh()
        .args(["sockets", "list"])
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("assh-sockets"));
}

#[test]
fn debug_mode_logs_dispatch() {
    assh()
        .args(["-D", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dispatching command"))
        .stderr(predicate::str::contains("DEBUG"));
}
