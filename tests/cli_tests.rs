//! CLI interface tests
//!
//! Tests basic CLI functionality like --help, --version flags and argument
//! validation, without running any real cargo builds.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get the depcost binary command
fn get_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_depcost"))
}

#[test]
fn test_cli_help_flag_displays_usage_information() {
    let mut cmd = get_bin();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dependency binary-size cost analyzer",
        ));
}

#[test]
fn test_cli_version_flag_displays_version_number() {
    let mut cmd = get_bin();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_without_subcommand_shows_command_list() {
    let mut cmd = get_bin();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cost"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_cost_without_dependencies_fails_with_usage_error() {
    let mut cmd = get_bin();
    cmd.arg("cost")
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("at least one dependency"))
        .stderr(predicate::str::contains("--from-manifest"));
}

#[test]
fn test_cost_with_unknown_os_fails() {
    let mut cmd = get_bin();
    cmd.arg("cost")
        .arg("serde")
        .arg("--os")
        .arg("plan9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target OS"));
}

#[test]
fn test_cost_with_unknown_arch_fails() {
    let mut cmd = get_bin();
    cmd.arg("cost")
        .arg("serde")
        .arg("--arch")
        .arg("mips")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target architecture"));
}

#[test]
fn test_cost_with_missing_manifest_fails_with_noinput_code() {
    let mut cmd = get_bin();
    cmd.arg("cost")
        .arg("--from-manifest")
        .arg("/nonexistent/path/Cargo.toml")
        .assert()
        .failure()
        .code(66)
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn test_completions_bash_generates_script() {
    let mut cmd = get_bin();
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("depcost"));
}

#[test]
fn test_completions_requires_shell_argument() {
    let mut cmd = get_bin();
    cmd.arg("completions").assert().failure();
}

#[test]
fn test_cost_help_documents_platform_flags() {
    let mut cmd = get_bin();
    cmd.arg("cost")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--os"))
        .stdout(predicate::str::contains("--arch"))
        .stdout(predicate::str::contains("--from-manifest"))
        .stdout(predicate::str::contains("--json"));
}
