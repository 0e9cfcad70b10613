use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use tempfile::TempDir;

/// Helper function to create a temporary database seeded with three people
fn create_cli_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("cli_test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test database");
    conn.execute_batch(
        "CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER NOT NULL);
         INSERT INTO person (id, name, age) VALUES
             (1, 'Ash', 10),
             (2, 'Misty', 10),
             (3, 'Professor Oak', 50);",
    )
    .expect("Failed to seed test database");
    (temp_dir, db_path)
}

/// Helper function to create a Command with --no-color flag for testing
fn tabula_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tabula").expect("Failed to find tabula binary");
    cmd.env("COLUMNS", "80")
        .arg("--no-color")
        .args(["--database-file", db_path.to_str().unwrap()]);
    cmd
}

const PASSING_RUN: &str = r#"{ "type": "suite", "event": "started", "test_count": 2 }
{ "type": "test", "event": "started", "name": "tests::first" }
{ "type": "test", "name": "tests::first", "event": "ok", "exec_time": 0.002 }
{ "type": "test", "event": "started", "name": "tests::second" }
{ "type": "test", "name": "tests::second", "event": "ignored", "message": "some reason" }
{ "type": "suite", "event": "ok", "passed": 1, "failed": 0, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.004 }
"#;

const FAILING_RUN: &str = r#"{ "type": "suite", "event": "started", "test_count": 1 }
{ "type": "test", "event": "started", "name": "tests::broken" }
{ "type": "test", "name": "tests::broken", "event": "failed", "exec_time": 0.125, "stdout": "thread 'tests::broken' panicked at src/lib.rs:3:5:\nassertion `left == right` failed\n" }
{ "type": "suite", "event": "failed", "passed": 0, "failed": 1, "ignored": 0, "measured": 0, "filtered_out": 0, "exec_time": 0.125 }
"#;

#[test]
fn test_cli_query_all_rows() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--plural", "people"])
        .assert()
        .success()
        .stdout(predicate::str::contains("           People           "))
        .stdout(predicate::str::contains("┃ id ┃ name          ┃ age ┃"))
        .stdout(predicate::str::contains("│ 3  │ Professor Oak │ 50  │"));
}

#[test]
fn test_cli_query_default_title() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--values", "name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Persons"))
        .stdout(predicate::str::contains("┃ name          ┃"));
}

#[test]
fn test_cli_query_limit_adds_caption() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("│ …   │ …    │ …   │"))
        .stdout(predicate::str::contains("   1 of 3 records   "));
}

#[test]
fn test_cli_query_annotate_and_order() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    let output = tabula_cmd(&db_path)
        .args([
            "query",
            "person",
            "--values",
            "name",
            "--annotate",
            "len=LENGTH(name)",
            "--order-by",
            "-age",
        ])
        .output()
        .expect("Failed to run tabula");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[2], "┃ name          ┃ len ┃");
    assert_eq!(lines[4], "│ Professor Oak │ 13  │");
}

#[test]
fn test_cli_query_only_and_defer() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--only", "age"])
        .assert()
        .success()
        .stdout(predicate::str::contains("┃ age ┃"))
        .stdout(predicate::str::contains("name").not());

    tabula_cmd(&db_path)
        .args(["query", "person", "--defer", "age"])
        .assert()
        .success()
        .stdout(predicate::str::contains("┃ id ┃ name          ┃"))
        .stdout(predicate::str::contains("age").not());
}

#[test]
fn test_cli_query_filtered_to_nothing() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--filter", "age > 100"])
        .assert()
        .success()
        .stdout("Empty QuerySet.\n");
}

#[test]
fn test_cli_query_unknown_table() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "pokemon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Table 'pokemon' not found. Available tables: person",
        ));
}

#[test]
fn test_cli_count_unknown_table_lists_tables() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["count", "pokemon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Table 'pokemon' not found. Available tables: person",
        ));
}

#[test]
fn test_cli_query_empty_database() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("empty.db");

    tabula_cmd(&db_path)
        .args(["query", "person"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Table 'person' not found. The database has no tables.",
        ));
}

#[test]
fn test_cli_flat_query_ignores_annotation() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["query", "person", "--flat", "name", "--annotate", "len=LENGTH(name)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("│ Professor Oak │"))
        .stdout(predicate::str::contains("len").not());
}

#[test]
fn test_cli_count() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["count", "person"])
        .assert()
        .success()
        .stdout("3\n");

    tabula_cmd(&db_path)
        .args(["count", "person", "--filter", "age = 10"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_cli_aggregate() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["aggregate", "person", "age__sum=SUM(age)"])
        .assert()
        .success()
        .stdout(
            "┏━━━━━━━━━━┓\n┃ age__sum ┃\n┡━━━━━━━━━━┩\n│ 70       │\n└──────────┘\n",
        );
}

#[test]
fn test_cli_conflicting_color_flags() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .args(["--force-color", "count", "person"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "The --no-color and --force-color options can't be used together.",
        ));
}

#[test]
fn test_cli_test_report_passing_normal() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    let output = tabula_cmd(&db_path)
        .arg("test")
        .write_stdin(PASSING_RUN)
        .output()
        .expect("Failed to run tabula");
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines[0], ".s");
    assert_eq!(lines[1], "-".repeat(70));
    assert_eq!(lines[2], "Ran 2 tests in 0.004s");
    assert!(stderr.ends_with("OK (skipped=1)\n"));
}

#[test]
fn test_cli_test_report_verbose() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    let output = tabula_cmd(&db_path)
        .args(["test", "-v", "2"])
        .write_stdin(PASSING_RUN)
        .output()
        .expect("Failed to run tabula");

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(
        lines[..4],
        [
            "tests::first ... ok",
            "tests::second ... skipped 'some reason'",
            "",
            "-".repeat(70).as_str(),
        ]
    );
}

#[test]
fn test_cli_test_report_failure() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    let output = tabula_cmd(&db_path)
        .args(["test", "-v", "0"])
        .write_stdin(FAILING_RUN)
        .output()
        .expect("Failed to run tabula");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines[0], "─".repeat(80));
    assert_eq!(lines[1], "FAIL: tests::broken");
    assert_eq!(lines[2], "─".repeat(80));
    assert_eq!(lines[3], "thread 'tests::broken' panicked at src/lib.rs:3:5:");
    assert!(stderr.ends_with("FAILED (failures=1)\n"));
}

#[test]
fn test_cli_test_report_timing_from_file() {
    let (temp_dir, db_path) = create_cli_test_environment();
    let events = temp_dir.path().join("events.json");
    std::fs::write(&events, PASSING_RUN).expect("Failed to write events");

    tabula_cmd(&db_path)
        .args(["test", "--timing", events.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Slowest 2 Tests"))
        .stderr(predicate::str::contains("0.002s tests::first"));
}

#[test]
fn test_cli_test_report_malformed_events() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    tabula_cmd(&db_path)
        .arg("test")
        .write_stdin("{ \"type\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read test events"));
}
