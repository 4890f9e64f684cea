//! End-to-end CLI tests for the vlab binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vlab() -> Command {
    Command::cargo_bin("vlab").expect("binary builds")
}

#[test]
fn resolve_prints_the_lookup_result() {
    vlab()
        .args(["resolve", "vlookup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12000"))
        .stdout(predicate::str::contains("=VLOOKUP(\"K02\"; A1:D5; 3; FALSE)"));
}

#[test]
fn resolve_surfaces_error_codes() {
    vlab()
        .args(["resolve", "vlookup", "--lookup", "ZZZ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#N/A"));
}

#[test]
fn resolve_complex_mode_uses_the_reference_table() {
    vlab()
        .args(["resolve", "vlookup", "--mode", "complex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$A$10:$D$14"))
        .stdout(predicate::str::contains("12000"));
}

#[test]
fn run_animates_and_marks_progress() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("progress.json");

    vlab()
        .args([
            "run",
            "countif",
            "--criteria",
            "Minuman",
            "--interval-ms",
            "1",
            "--progress-file",
        ])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 matching item(s)"))
        .stdout(predicate::str::contains("COUNTIF marked as completed"));

    vlab()
        .args(["progress", "--progress-file"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("COUNTIF"))
        .stdout(predicate::str::contains("Simulations run: 1"));

    vlab()
        .args(["list", "--progress-file"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("COUNTIF"));
}

#[test]
fn run_refuses_out_of_range_input_with_a_hint() {
    let dir = TempDir::new().unwrap();
    vlab()
        .args([
            "run",
            "vlookup",
            "--column",
            "9",
            "--interval-ms",
            "1",
            "--progress-file",
        ])
        .arg(dir.path().join("progress.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("col_index_num must be between 1 and 4"));
}

#[test]
fn run_text_function_with_custom_formula() {
    let dir = TempDir::new().unwrap();
    vlab()
        .args([
            "run",
            "upper",
            "--formula",
            "=UPPER(B3)",
            "--interval-ms",
            "1",
            "--progress-file",
        ])
        .arg(dir.path().join("progress.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("DEWI LESTARI"));
}

#[test]
fn malformed_text_formula_fails_with_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    vlab()
        .args([
            "run",
            "upper",
            "--formula",
            "UPPER(B2)",
            "--interval-ms",
            "1",
            "--progress-file",
        ])
        .arg(dir.path().join("progress.json"))
        .assert()
        .failure();
}

#[test]
fn unknown_function_is_rejected() {
    vlab().args(["resolve", "frobnicate"]).assert().failure();
}

#[test]
fn info_shows_syntax_and_challenge() {
    vlab()
        .args(["info", "choose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=CHOOSE(index_num"))
        .stdout(predicate::str::contains("Challenge"));
}

#[test]
fn speed_presets_are_the_only_accepted_values() {
    let dir = TempDir::new().unwrap();
    vlab()
        .args([
            "run",
            "choose",
            "--speed",
            "2",
            "--interval-ms",
            "1",
            "--progress-file",
        ])
        .arg(dir.path().join("progress.json"))
        .assert()
        .success();

    vlab()
        .args(["run", "choose", "--speed", "3"])
        .assert()
        .failure();
}
