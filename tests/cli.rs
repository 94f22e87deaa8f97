use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn snip_cmd() -> Command {
    let mut cmd = Command::cargo_bin("region_snip").expect("binary exists");
    cmd.env("REGION_SNIP_NO_DIALOG", "1");
    cmd
}

#[test]
fn help_prints_usage() {
    snip_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Select a region of the screen and save it as a PNG",
        ))
        .stdout(predicate::str::contains("--escapekey"));
}

#[test]
fn missing_file_argument_exits_with_one() {
    snip_cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn unknown_escape_key_exits_with_one() {
    snip_cmd()
        .args(["-f", "out.png", "-e", "hyper"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown key name 'hyper'"));
}

#[test]
fn missing_output_directory_exits_before_any_window() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("does-not-exist").join("shot.png");
    snip_cmd()
        .env("RUST_LOG", "error")
        .arg("--file")
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("doesn't exist"));
    assert!(!target.exists());
}
