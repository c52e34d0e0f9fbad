// Regression tests for the `phpast` binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

/// A fresh scratch directory per test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("phpast-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn phpast() -> Command {
    Command::cargo_bin("phpast").unwrap()
}

#[test]
fn ast_prints_the_tree_as_json() {
    let dir = scratch("json");
    let file = dir.join("ok.php");
    fs::write(&file, "<?php echo $greeting;").unwrap();

    phpast()
        .arg("ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains(r#""name": "Program""#).and(contains(r#""name": "EchoStatement""#)));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn ast_bounds_flag_adds_positions() {
    let dir = scratch("bounds");
    let file = dir.join("ok.php");
    fs::write(&file, "<?php return 1;").unwrap();

    phpast()
        .args(["ast", "--bounds"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains(r#""bounds""#).and(contains(r#""line": 1"#)));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn ast_prints_yaml_on_request() {
    let dir = scratch("yaml");
    let file = dir.join("ok.php");
    fs::write(&file, "<?php return 1;").unwrap();

    phpast()
        .args(["ast", "--format", "yaml"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("name: Program"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn ast_reports_parse_errors_with_miette() {
    let dir = scratch("bad");
    let file = dir.join("bad.php");
    fs::write(&file, "<?php\n$x = ;\n").unwrap();

    phpast()
        .arg("ast")
        .arg(&file)
        .args(["--path-name", "bad.php"])
        .assert()
        .code(1)
        .stderr(contains("PHP Parse error").and(contains("php::parse")));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn ast_on_a_missing_file_is_an_io_error() {
    phpast()
        .args(["ast", "/nonexistent/phpast/missing.php"])
        .assert()
        .code(2)
        .stderr(contains("Error:"));
}

#[test]
fn check_walks_a_directory() {
    let dir = scratch("check");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("a.php"), "<?php echo 1;").unwrap();
    fs::write(dir.join("nested/b.php"), "<?php function f() { return 2; }").unwrap();
    fs::write(dir.join("notes.txt"), "not php (").unwrap();

    phpast()
        .arg("check")
        .arg(&dir)
        .assert()
        .success()
        .stdout(contains("2 checked, 0 failed"));

    fs::write(dir.join("nested/c.php"), "<?php echo ;").unwrap();
    phpast()
        .arg("check")
        .arg(&dir)
        .assert()
        .code(1)
        .stdout(contains("FAIL").and(contains("3 checked, 1 failed")));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn grammar_validates_the_rule_table() {
    phpast()
        .arg("grammar")
        .assert()
        .success()
        .stdout(contains("rules"));
}
