//! Reader for libtest's JSON event stream.
//!
//! `cargo test -- -Z unstable-options --format json --report-time` writes one
//! JSON object per line. Each test event is fed into a [`TestResult`]; lines
//! that are not JSON (output from tests run with `--nocapture`, cargo's own
//! banners) are echoed unchanged.

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use log::{debug, warn};
use serde::Deserialize;

use super::TestResult;
use crate::error::{Result, TabulaError};

/// One line of libtest JSON output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Suite {
        event: SuiteEvent,
        #[serde(default)]
        test_count: Option<usize>,
        #[serde(default)]
        exec_time: Option<f64>,
    },
    Test {
        event: TestEvent,
        name: String,
        #[serde(default)]
        stdout: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        exec_time: Option<f64>,
    },
    /// Bench results and anything newer libtest versions emit.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteEvent {
    Started,
    Ok,
    Failed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestEvent {
    Started,
    Ok,
    Failed,
    Ignored,
    Timeout,
    #[serde(other)]
    Other,
}

/// Parse one line. `Ok(None)` for lines that are not JSON objects.
pub fn parse_line(line: &str) -> Result<Option<Event>> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Feed every event from `input` into `result`.
///
/// Returns the total execution time the suites reported, summed across test
/// binaries. Reading stops early once `result` asks to stop.
pub fn consume<R: BufRead, W: Write>(input: R, result: &mut TestResult<W>) -> Result<Duration> {
    let mut elapsed = Duration::ZERO;

    for line in input.lines() {
        let line = line?;
        let Some(event) = parse_line(&line)? else {
            if !line.trim().is_empty() {
                result.console_mut().println(&line)?;
            }
            continue;
        };

        match event {
            Event::Suite {
                event: SuiteEvent::Started,
                test_count,
                ..
            } => {
                debug!("Suite started with {} tests", test_count.unwrap_or(0));
            }
            Event::Suite { exec_time, .. } => {
                elapsed += seconds(exec_time).unwrap_or_default();
            }
            Event::Test {
                event,
                name,
                stdout,
                message,
                exec_time,
            } => {
                apply(result, event, &name, stdout, message, seconds(exec_time))?;
                if result.should_stop() {
                    debug!("Stopping after {name}");
                    break;
                }
            }
            Event::Other => {}
        }
    }

    Ok(elapsed)
}

fn apply<W: Write>(
    result: &mut TestResult<W>,
    event: TestEvent,
    name: &str,
    stdout: Option<String>,
    message: Option<String>,
    exec_time: Option<Duration>,
) -> Result<()> {
    match event {
        TestEvent::Started => {
            result.start_test(name);
            return Ok(());
        }
        TestEvent::Ok => result.add_success(name)?,
        TestEvent::Failed => {
            let details = stdout.or(message).unwrap_or_default();
            result.add_failure(name, &details)?;
        }
        TestEvent::Ignored => {
            let reason = message.unwrap_or_default();
            result.add_skip(name, &reason)?;
        }
        TestEvent::Timeout => {
            warn!("{name} has been running for a long time");
            return Ok(());
        }
        TestEvent::Other => {
            return Err(TabulaError::invalid_input(
                "event",
                format!("unknown event for test {name}"),
            ));
        }
    }
    result.stop_test(name, exec_time);
    Ok(())
}

fn seconds(exec_time: Option<f64>) -> Option<Duration> {
    exec_time
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
