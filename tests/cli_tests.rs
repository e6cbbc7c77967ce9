//! CLI integration tests.

use std::io::Write;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn abode() -> Command {
    cargo_bin_cmd!("abode")
}

fn demo_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/scenario.toml")
}

#[test]
fn test_help() {
    abode()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("abode"))
        .stdout(predicate::str::contains("solve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version() {
    abode()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("abode"));
}

#[test]
fn test_check_valid_scenario() {
    abode()
        .args(["check", "--config"])
        .arg(demo_scenario())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("own market: 1 archetypes, 90 units"));
}

#[test]
fn test_check_returns_nonzero_on_config_error() {
    let base = std::fs::read_to_string(demo_scenario()).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(base.replace("age = 35", "age = 12").as_bytes())
        .unwrap();

    abode()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("below adulthood"));
}

#[test]
fn test_solve_json_reports_convergence() {
    abode()
        .args(["solve", "--json", "--tenure", "own", "--config"])
        .arg(demo_scenario())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"converged\": true"))
        .stdout(predicate::str::contains("\"trajectory\""))
        .stdout(predicate::str::contains("\"demand_supply\""));
}

#[test]
fn test_solve_summary() {
    abode()
        .args(["solve", "--config"])
        .arg(demo_scenario())
        .assert()
        .success()
        .stdout(predicate::str::contains("own market converged"));
}

#[test]
fn test_solve_reports_exhausted_budget() {
    abode()
        .args(["solve", "--max-steps", "2", "--config"])
        .arg(demo_scenario())
        .assert()
        .success()
        .stdout(predicate::str::contains("not converged after 2 steps"));
}

#[test]
fn test_solve_rejects_unknown_tenure() {
    abode()
        .args(["solve", "--tenure", "lease", "--config"])
        .arg(demo_scenario())
        .assert()
        .failure();
}
