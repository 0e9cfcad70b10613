mod common;

use std::time::Duration;

use common::{output_lines, test_console};
use tabula_core::{report::libtest, TestResult};

const MIXED_RUN: &str = r#"{ "type": "suite", "event": "started", "test_count": 3 }
{ "type": "test", "event": "started", "name": "tests::test_pass" }
{ "type": "test", "event": "started", "name": "tests::test_failure" }
{ "type": "test", "name": "tests::test_pass", "event": "ok", "exec_time": 0.01 }
{ "type": "test", "name": "tests::test_failure", "event": "failed", "exec_time": 0.3, "stdout": "thread 'tests::test_failure' panicked at src/lib.rs:9:9:\nassertion `left == right` failed\n  left: 1\n right: 2\n" }
{ "type": "test", "event": "started", "name": "tests::test_skip" }
{ "type": "test", "name": "tests::test_skip", "event": "ignored", "message": "some reason" }
{ "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.5 }
"#;

fn replay(verbosity: u8) -> Vec<String> {
    let mut result = TestResult::new(test_console(), verbosity);
    let elapsed = libtest::consume(MIXED_RUN.as_bytes(), &mut result).unwrap();
    result.print_errors().unwrap();
    result.print_summary(elapsed).unwrap();
    result.print_durations().unwrap();
    output_lines(result.into_console())
}

#[test]
fn test_quiet_run_starts_with_failure_listing() {
    let lines = replay(0);
    assert_eq!(lines[0], "─".repeat(80));
    assert_eq!(lines[1], "FAIL: tests::test_failure");
    assert_eq!(lines[2], "─".repeat(80));
    assert_eq!(lines[3], "thread 'tests::test_failure' panicked at src/lib.rs:9:9:");
    assert_eq!(lines[6], " right: 2");
}

#[test]
fn test_normal_run_prints_dots() {
    let lines = replay(1);
    assert_eq!(lines[0], ".Fs");
    assert_eq!(lines[1], "─".repeat(80));
}

#[test]
fn test_verbose_run_prints_a_line_per_test() {
    let lines = replay(2);
    assert_eq!(
        lines[..5],
        [
            "tests::test_pass ... ok",
            "tests::test_failure ... FAIL",
            "tests::test_skip ... skipped 'some reason'",
            "",
            "─".repeat(80).as_str(),
        ]
    );
}

#[test]
fn test_summary_and_durations_follow_errors() {
    let lines = replay(1);
    let summary = lines
        .iter()
        .position(|line| line == &"-".repeat(70))
        .expect("summary separator");
    assert_eq!(lines[summary + 1], "Ran 3 tests in 0.500s");
    assert_eq!(lines[summary + 3], "FAILED (failures=1, skipped=1)");
    assert_eq!(lines[summary + 5], "Slowest 3 Tests");
    assert_eq!(lines[summary + 7], "0.300s tests::test_failure");
    assert_eq!(lines[summary + 8], "0.010s tests::test_pass");
}

#[test]
fn test_manual_callbacks() {
    let mut result = TestResult::new(test_console(), 1);
    for name in ["a", "b"] {
        result.start_test(name);
        result.add_success(name).unwrap();
        result.stop_test(name, Some(Duration::from_millis(1)));
    }
    result.start_test("c");
    result.add_expected_failure("c", "known bug").unwrap();
    result.stop_test("c", None);

    assert!(result.was_successful());
    assert_eq!(result.exit_code(), 0);
    assert_eq!(result.durations().len(), 3);

    result.print_summary(Duration::from_millis(3)).unwrap();
    let lines = output_lines(result.into_console());
    assert_eq!(lines[0], format!("..x{}", "-".repeat(70)));
    assert_eq!(lines.last().unwrap(), "OK (expected failures=1)");
}
