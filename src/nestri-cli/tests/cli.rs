//! Exit-code and output contract of the `nestri` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn nestri() -> Command {
    let mut cmd = Command::cargo_bin("nestri").expect("nestri binary exists");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_command_prints_help_and_exits_2() {
    nestri()
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("neofetch"))
        .stderr(predicate::str::contains("A command is required"));
}

#[test]
fn test_flags_only_exits_2() {
    nestri().arg("-vv").assert().failure().code(2);
}

#[test]
fn test_unknown_command_exits_127() {
    nestri()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("Unknown command 'frobnicate'"))
        .stderr(predicate::str::contains("nestri --help"));
}

#[test]
fn test_unknown_command_suggests_prefix_match() {
    nestri()
        .arg("neo")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("Did you mean: neofetch?"));
}

#[test]
fn test_lookup_is_case_sensitive() {
    nestri().arg("RUN").assert().code(127);
}

#[test]
fn test_help_lists_commands_in_order() {
    nestri()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)neofetch.*run").unwrap())
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_version() {
    nestri()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_global_flag_is_usage_error() {
    nestri()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_command_help_is_forwarded() {
    nestri()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--gpu"))
        .stdout(predicate::str::contains("--hdr"));
}

#[test]
fn test_command_argument_error_exits_1() {
    nestri()
        .args(["neofetch", "extra"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("extra"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_run_without_any_game_fails() {
    let home = TempDir::new().unwrap();

    nestri()
        .env("NESTRI_HOME", home.path())
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "no game specified and no previous game selected",
        ));
}

#[cfg(target_os = "linux")]
#[test]
fn test_run_rejects_stored_non_exe() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.toml"), "game = \"notes.txt\"\n").unwrap();

    nestri()
        .env("NESTRI_HOME", home.path())
        .args(["-v", "run"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not an .exe"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_run_rejects_game_outside_game_directory() {
    let home = TempDir::new().unwrap();

    nestri()
        .env("NESTRI_HOME", home.path())
        .args(["run", "/opt/elsewhere/Hades.exe"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("outside the game directory"));

    assert!(!home.path().join("config.toml").exists());
}
