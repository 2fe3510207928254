//! Timed keystroke scripts
//!
//! A script describes what a user typed and when, one step per line:
//!
//! ```text
//! # offset_ms  action
//! 0    j
//! 120  ja
//! 240  jazz
//! 900  jazz !rock
//! 1500 :exclude open air
//! 2000 :clear
//! ```
//!
//! Replaying it on a [`ManualClock`] shows which filter runs the debounce
//! timer lets through.

use crate::clock::{Clock, ManualClock};
use crate::controller::{FilterController, FilterOutcome, QueryInput};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
    #[error("Line {line}: invalid offset '{offset}', expected milliseconds")]
    InvalidOffset { line: usize, offset: String },
    #[error(
        "Line {line}: offset {offset_ms}ms is earlier than the previous step ({previous_ms}ms)"
    )]
    OutOfOrder {
        line: usize,
        offset_ms: u64,
        previous_ms: u64,
    },
}

/// What the user did at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The input now holds this text
    Type(String),
    Clear,
    Exclude(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub at: Duration,
    pub action: Action,
}

/// What caused a filter run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Debounce,
    Clear,
    Exclude,
}

/// A filter run observed during replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Firing {
    pub at_ms: u64,
    pub query: String,
    pub trigger: Trigger,
    pub outcome: FilterOutcome,
}

pub fn parse_script(raw: &str) -> Result<Vec<Step>, ReplayError> {
    let mut steps = Vec::new();
    let mut previous_ms = 0;

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_start();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let (offset, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim_end(), ""));
        let offset_ms: u64 = offset.parse().map_err(|_| ReplayError::InvalidOffset {
            line: line_no,
            offset: offset.to_string(),
        })?;
        if offset_ms < previous_ms {
            return Err(ReplayError::OutOfOrder {
                line: line_no,
                offset_ms,
                previous_ms,
            });
        }
        previous_ms = offset_ms;

        steps.push(Step {
            at: Duration::from_millis(offset_ms),
            action: parse_action(rest, line_no)?,
        });
    }

    Ok(steps)
}

fn parse_action(rest: &str, line: usize) -> Result<Action, ReplayError> {
    let command = rest.trim();
    let (head, tail) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    match head {
        ":clear" if tail.trim().is_empty() => Ok(Action::Clear),
        ":clear" => Err(ReplayError::InvalidLine {
            line,
            reason: ":clear takes no arguments".to_string(),
        }),
        ":exclude" if tail.trim().is_empty() => Err(ReplayError::InvalidLine {
            line,
            reason: ":exclude needs at least one word".to_string(),
        }),
        ":exclude" => Ok(Action::Exclude(tail.trim().to_string())),
        _ => Ok(Action::Type(rest.trim_end_matches('\r').to_string())),
    }
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(&raw)
}

/// Drive `controller` through `steps`
///
/// `clock` must be the clock the controller was attached with. Pending
/// evaluations fire at their deadline, before any later step; the last one is
/// flushed after the final step.
pub fn replay<T, I, C>(
    controller: &mut FilterController<T, I, C>,
    clock: &ManualClock,
    steps: &[Step],
) -> Vec<Firing>
where
    I: QueryInput,
    C: Clock,
{
    let mut firings = Vec::new();

    for step in steps {
        fire_due(controller, clock, step.at, &mut firings);
        clock.set(step.at);

        match &step.action {
            Action::Type(text) => controller.on_input(text),
            Action::Clear => {
                let outcome = controller.clear();
                firings.push(firing(clock, controller, Trigger::Clear, outcome));
            }
            Action::Exclude(phrase) => {
                let outcome = controller.exclude(phrase);
                firings.push(firing(clock, controller, Trigger::Exclude, outcome));
            }
        }
    }

    fire_due(controller, clock, Duration::MAX, &mut firings);
    debug!(steps = steps.len(), firings = firings.len(), "replay finished");
    firings
}

fn fire_due<T, I: QueryInput, C: Clock>(
    controller: &mut FilterController<T, I, C>,
    clock: &ManualClock,
    until: Duration,
    firings: &mut Vec<Firing>,
) {
    if let Some(deadline) = controller.next_deadline().filter(|d| *d <= until) {
        clock.set(deadline);
        if let Some(outcome) = controller.poll() {
            firings.push(firing(clock, controller, Trigger::Debounce, outcome));
        }
    }
}

fn firing<T, I: QueryInput, C: Clock>(
    clock: &ManualClock,
    controller: &FilterController<T, I, C>,
    trigger: Trigger,
    outcome: FilterOutcome,
) -> Firing {
    Firing {
        at_ms: u64::try_from(clock.now().as_millis()).unwrap_or(u64::MAX),
        query: controller.last_query().to_string(),
        trigger,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = "# comment\n0 j\n\n120 jazz !rock\n300\n400 :clear\n500 :exclude Open Air\n";
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].action, Action::Type("j".to_string()));
        assert_eq!(steps[1].action, Action::Type("jazz !rock".to_string()));
        assert_eq!(steps[2].action, Action::Type(String::new()));
        assert_eq!(steps[3].action, Action::Clear);
        assert_eq!(steps[4].action, Action::Exclude("Open Air".to_string()));
        assert_eq!(steps[4].at, Duration::from_millis(500));
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(matches!(
            parse_script("abc jazz"),
            Err(ReplayError::InvalidOffset { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("100 a\n50 b"),
            Err(ReplayError::OutOfOrder {
                line: 2,
                offset_ms: 50,
                previous_ms: 100
            })
        ));
        assert!(matches!(
            parse_script("0 :exclude"),
            Err(ReplayError::InvalidLine { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("0 jazz\n100 :clear extra"),
            Err(ReplayError::InvalidLine { line: 2, .. })
        ));
    }
}
