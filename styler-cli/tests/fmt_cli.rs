use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".r").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn fmt_dry_on_reports_without_writing() {
    let file = write_fixture("x <- 1\n");
    let mut cmd = cargo_bin_cmd!("styler");
    cmd.arg("fmt").arg(file.path()).arg("--dry").arg("on");
    cmd.assert().success();

    let unchanged = fs::read_to_string(file.path()).unwrap();
    assert_eq!(unchanged, "x <- 1\n");
}

#[test]
fn fmt_writes_back_by_default() {
    let file = write_fixture("x<-1\n");
    let mut cmd = cargo_bin_cmd!("styler");
    cmd.arg("fmt").arg(file.path());
    cmd.assert().success().stdout(predicate::str::contains("reformatted"));
}

#[test]
fn fmt_dry_fail_errors_when_a_change_is_needed() {
    let file = write_fixture("x<-1\n");
    let mut cmd = cargo_bin_cmd!("styler");
    cmd.arg("fmt").arg(file.path()).arg("--dry").arg("fail");
    cmd.assert().failure();
}

#[test]
fn fmt_unknown_style_guide_fails_with_a_message() {
    let file = write_fixture("x <- 1\n");
    let mut cmd = cargo_bin_cmd!("styler");
    cmd.arg("fmt").arg(file.path()).arg("--style").arg("nonexistent");
    cmd.assert().failure().stderr(predicate::str::contains("unknown style guide"));
}
