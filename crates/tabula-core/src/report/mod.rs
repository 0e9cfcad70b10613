//! Styled test-run reporting.
//!
//! [`TestResult`] receives one callback per test event (start, stop and an
//! outcome) and writes progress to a [`Console`]: a coloured dot per test at
//! normal verbosity, `name ... outcome` lines when verbose, nothing when
//! quiet. After the run it lists errors and failures between rules, prints a
//! summary and reports the slowest tests.
//!
//! Events usually come from libtest's JSON output, see [`libtest`].

use std::{
    collections::HashMap,
    io::Write,
    time::{Duration, Instant},
};

use crate::{
    console::{Console, Style},
    error::Result,
};

pub mod durations;
pub mod libtest;

/// Width of the dashed line above the run summary.
const SEPARATOR_WIDTH: usize = 70;

/// Collects test outcomes and writes styled progress.
pub struct TestResult<W: Write> {
    console: Console<W>,
    verbosity: u8,
    failfast: bool,
    should_stop: bool,
    tests_run: usize,
    started: HashMap<String, Instant>,
    errors: Vec<(String, String)>,
    failures: Vec<(String, String)>,
    skipped: Vec<(String, String)>,
    expected_failures: Vec<(String, String)>,
    unexpected_successes: Vec<String>,
    durations: Vec<(String, Duration)>,
}

impl<W: Write> TestResult<W> {
    /// Verbosity 0 is quiet, 1 prints dots, 2 and above prints a line per test.
    pub fn new(console: Console<W>, verbosity: u8) -> Self {
        Self {
            console,
            verbosity,
            failfast: false,
            should_stop: false,
            tests_run: 0,
            started: HashMap::new(),
            errors: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
            expected_failures: Vec::new(),
            unexpected_successes: Vec::new(),
            durations: Vec::new(),
        }
    }

    /// Stop after the first error, failure or unexpected success.
    pub fn with_failfast(mut self, failfast: bool) -> Self {
        self.failfast = failfast;
        self
    }

    fn show_all(&self) -> bool {
        self.verbosity > 1
    }

    fn dots(&self) -> bool {
        self.verbosity == 1
    }

    pub fn start_test(&mut self, name: &str) {
        self.tests_run += 1;
        self.started.insert(name.to_string(), Instant::now());
    }

    /// Record how long `name` took: `exec_time` when the runner measured it,
    /// otherwise the time since [`TestResult::start_test`].
    pub fn stop_test(&mut self, name: &str, exec_time: Option<Duration>) {
        let started = self.started.remove(name);
        if let Some(duration) = exec_time.or_else(|| started.map(|s| s.elapsed())) {
            self.durations.push((name.to_string(), duration));
        }
    }

    pub fn add_success(&mut self, name: &str) -> Result<()> {
        self.report(name, "ok", ".", Style::SUCCESS)
    }

    pub fn add_error(&mut self, name: &str, details: &str) -> Result<()> {
        self.errors.push((name.to_string(), details.to_string()));
        self.stop_if_failfast();
        self.report(name, "ERROR", "E", Style::FAILURE)
    }

    pub fn add_failure(&mut self, name: &str, details: &str) -> Result<()> {
        self.failures.push((name.to_string(), details.to_string()));
        self.stop_if_failfast();
        self.report(name, "FAIL", "F", Style::FAILURE)
    }

    pub fn add_skip(&mut self, name: &str, reason: &str) -> Result<()> {
        self.skipped.push((name.to_string(), reason.to_string()));
        let word = format!("skipped '{reason}'");
        self.report(name, &word, "s", Style::WARNING)
    }

    pub fn add_expected_failure(&mut self, name: &str, details: &str) -> Result<()> {
        self.expected_failures
            .push((name.to_string(), details.to_string()));
        self.report(name, "expected failure", "x", Style::WARNING)
    }

    pub fn add_unexpected_success(&mut self, name: &str) -> Result<()> {
        self.unexpected_successes.push(name.to_string());
        self.stop_if_failfast();
        self.report(name, "unexpected success", "u", Style::FAILURE)
    }

    fn stop_if_failfast(&mut self) {
        if self.failfast {
            self.should_stop = true;
        }
    }

    fn report(&mut self, name: &str, word: &str, short: &str, style: Style) -> Result<()> {
        if self.show_all() {
            let word = self.console.paint(word, style);
            self.console.println(format!("{name} ... {word}"))
        } else if self.dots() {
            self.console.print_styled_inline(short, style)
        } else {
            Ok(())
        }
    }

    /// List every error and failure, each headed by a titled rule.
    pub fn print_errors(&mut self) -> Result<()> {
        if self.dots() || self.show_all() {
            self.console.println("")?;
        }
        let errors = std::mem::take(&mut self.errors);
        let failures = std::mem::take(&mut self.failures);
        self.print_error_list("ERROR", &errors)?;
        self.print_error_list("FAIL", &failures)?;
        self.errors = errors;
        self.failures = failures;
        Ok(())
    }

    fn print_error_list(&mut self, flavour: &str, errors: &[(String, String)]) -> Result<()> {
        for (name, details) in errors {
            self.console
                .titled_rule(&format!("{flavour}: {name}"), Style::SUCCESS)?;
            for line in details.trim_end().lines() {
                if is_panic_header(line) {
                    self.console.print_styled(line, Style::FAILURE.bold())?;
                } else {
                    self.console.println(line)?;
                }
            }
            self.console.println("")?;
        }
        Ok(())
    }

    /// The closing `Ran N tests` block with the overall verdict.
    pub fn print_summary(&mut self, elapsed: Duration) -> Result<()> {
        let run = self.tests_run;
        self.console.println("-".repeat(SEPARATOR_WIDTH))?;
        self.console.println(format!(
            "Ran {run} test{} in {:.3}s",
            if run == 1 { "" } else { "s" },
            elapsed.as_secs_f64()
        ))?;
        self.console.println("")?;

        let mut infos = Vec::new();
        if !self.was_successful() {
            if !self.failures.is_empty() {
                infos.push(format!("failures={}", self.failures.len()));
            }
            if !self.errors.is_empty() {
                infos.push(format!("errors={}", self.errors.len()));
            }
        }
        if !self.skipped.is_empty() {
            infos.push(format!("skipped={}", self.skipped.len()));
        }
        if !self.expected_failures.is_empty() {
            infos.push(format!("expected failures={}", self.expected_failures.len()));
        }
        if !self.unexpected_successes.is_empty() {
            infos.push(format!(
                "unexpected successes={}",
                self.unexpected_successes.len()
            ));
        }

        let (verdict, style) = if self.was_successful() {
            ("OK", Style::SUCCESS)
        } else {
            ("FAILED", Style::FAILURE)
        };
        let verdict = self.console.paint(verdict, style);
        if infos.is_empty() {
            self.console.println(verdict)
        } else {
            self.console
                .println(format!("{verdict} ({})", infos.join(", ")))
        }
    }

    /// Report the slowest tests, if any durations were recorded.
    pub fn print_durations(&mut self) -> Result<()> {
        if self.durations.is_empty() {
            return Ok(());
        }
        let amount = durations::amount_to_print(self.durations.len(), self.verbosity);
        self.console
            .titled_rule(&format!("Slowest {amount} Tests"), Style::SUCCESS)?;
        for (name, timing) in durations::slowest(&self.durations, self.verbosity) {
            let timing = self
                .console
                .paint(&durations::format_seconds(*timing), Style::WARNING.bold());
            self.console.println(format!("{timing} {name}"))?;
        }
        Ok(())
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    /// Number of failed and errored tests; zero means the run passed.
    pub fn exit_code(&self) -> usize {
        self.failures.len() + self.errors.len()
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }

    pub fn durations(&self) -> &[(String, Duration)] {
        &self.durations
    }

    pub fn console_mut(&mut self) -> &mut Console<W> {
        &mut self.console
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }
}

fn is_panic_header(line: &str) -> bool {
    line.starts_with("thread '") && line.contains("panicked at")
}
