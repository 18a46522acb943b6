//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `critic` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("critic").unwrap()
}

/// Ten reviews per polarity, perfectly separated by the `good`/`bad` columns.
fn write_polarity_csv(dir: &Path) -> PathBuf {
    let mut text = String::from("id,good,bad,label\n");
    for i in 0..10 {
        text.push_str(&format!("{},5,0,0\n", 2 * i));
        text.push_str(&format!("{},0,5,1\n", 2 * i + 1));
    }
    let path = dir.join("polarity.csv");
    std::fs::write(&path, text).unwrap();
    path
}

/// Three reviews for each of the four ratings.
fn write_ratings_tsv(dir: &Path) -> PathBuf {
    let mut text = String::from("awful\tmeh\tfine\tgreat\tlabel\n");
    for _ in 0..3 {
        text.push_str("6\t1\t0\t0\t0\n");
        text.push_str("1\t6\t1\t0\t1\n");
        text.push_str("0\t1\t6\t1\t2\n");
        text.push_str("0\t0\t1\t6\t3\n");
    }
    let path = dir.join("ratings.tsv");
    std::fs::write(&path, text).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cv"))
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("test"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("critic"));
}

// ---------------------------------------------------------------------------
// cv
// ---------------------------------------------------------------------------

#[test]
fn cv_without_data_errors() {
    cmd().arg("cv").assert().failure();
}

#[test]
fn cv_nonexistent_data_errors() {
    cmd()
        .args(["cv", "/nonexistent/reviews.csv"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn cv_separable_polarity_is_perfect() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_polarity_csv(dir.path());
    cmd()
        .arg("cv")
        .arg(&data)
        .args(["-k", "2", "--seed", "7", "--label-set", "binary", "--binary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Average accuracy: 1.0000"))
        .stdout(predicate::str::contains("Average binary accuracy: 1.0000"))
        .stderr(predicate::str::contains("Default config"));
}

#[test]
fn cv_single_fold_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_polarity_csv(dir.path());
    cmd()
        .arg("cv")
        .arg(&data)
        .args(["-k", "1", "--label-set", "binary"])
        .assert()
        .failure();
}

#[test]
fn cv_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_polarity_csv(dir.path());
    let config = dir.path().join("run.json");
    std::fs::write(
        &config,
        r#"{
            "loader": { "label_set": "binary" },
            "cross_validation": { "k": 2, "seed": 3, "label_set": "binary" }
        }"#,
    )
    .unwrap();
    cmd()
        .arg("cv")
        .arg(&data)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Average accuracy"))
        .stderr(predicate::str::contains("Using config"));
}

// ---------------------------------------------------------------------------
// train / test
// ---------------------------------------------------------------------------

#[test]
fn train_requires_output() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_ratings_tsv(dir.path());
    cmd().arg("train").arg(&data).assert().failure();
}

#[test]
fn train_then_test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_ratings_tsv(dir.path());
    let model = dir.path().join("model.json");

    cmd()
        .arg("train")
        .arg(&data)
        .arg("-o")
        .arg(&model)
        .assert()
        .success();
    assert!(model.exists());

    cmd()
        .arg("test")
        .arg(&model)
        .arg(&data)
        .arg("--binary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 12"))
        .stdout(predicate::str::contains("Precise: 1"))
        .stdout(predicate::str::contains("Binary:"));
}

#[test]
fn test_with_missing_model_errors() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_ratings_tsv(dir.path());
    cmd()
        .arg("test")
        .arg(dir.path().join("absent.json"))
        .arg(&data)
        .assert()
        .failure()
        .code(1);
}
