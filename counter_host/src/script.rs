//! # Counter Script Parser
//!
//! Provides a simple scripted format for driving a counter deterministically
//! in tests and demos.
//!
//! ## Format
//!
//! Scripts are line-based, with each line representing one step:
//! - Events: `increment`, `increment 5` (at most 10000 per line)
//! - Motion: `start`, `stop`, `toggle`
//! - Resets: `reset counter`, `reset whole`
//! - Time: `advance 16ms` (deliver a delta directly), `wait 1s` (move the
//!   clock, then tick), `tick` (poll the clock without moving it)
//! - Checks: `expect count 2`, `expect moving false`, `expect passed 1.5s`
//! - Comments: `# This is a comment`, also trailing after a step
//!
//! ## Example
//!
//! ```text
//! # Two events in a 1 second window
//! increment 2
//! wait 1001ms       # both deadlines pass, one expires
//! expect count 1
//! tick
//! expect count 0
//! ```

use crate::host::CounterAction;
use std::collections::VecDeque;
use thiserror::Error;

/// Largest repeat count accepted by `increment <n>`
pub const MAX_REPEAT: usize = 10_000;

/// Counter script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid duration format: {0}")]
    InvalidDelay(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,
}

/// A check against the host's current counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expectation {
    /// Live event count
    Count(usize),
    /// Motion state
    Moving(bool),
    /// Passed time in milliseconds
    Passed(f64),
}

/// A single scripted command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptCommand {
    /// Apply an operation to the counter
    Action(CounterAction),
    /// Move the clock forward (in milliseconds), then tick
    Wait(f64),
    /// Poll the clock and deliver whatever time elapsed
    Tick,
    /// Check the counter state
    Expect(Expectation),
}

/// A command together with the line it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    /// 1-based source line
    pub line: usize,
    /// Parsed command
    pub command: ScriptCommand,
}

/// Counter script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterScript {
    steps: VecDeque<ScriptStep>,
}

impl CounterScript {
    /// Creates a new empty script
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, ScriptError> {
        let mut steps = VecDeque::new();

        for (index, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let line_num = index + 1;
            let commands = Self::parse_line(line).map_err(|e| ScriptError::ParseError {
                line: line_num,
                message: e.to_string(),
            })?;
            steps.extend(commands.into_iter().map(|command| ScriptStep {
                line: line_num,
                command,
            }));
        }

        if steps.is_empty() {
            return Err(ScriptError::EmptyScript);
        }

        Ok(Self { steps })
    }

    /// Parses a single line of script
    fn parse_line(line: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
        let words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        let command = match words.as_slice() {
            ["increment"] => ScriptCommand::Action(CounterAction::Increment),
            ["increment", times] => {
                let times: usize = times
                    .parse()
                    .ok()
                    .filter(|&times| times <= MAX_REPEAT)
                    .ok_or_else(|| ScriptError::InvalidCommand(line.to_string()))?;
                return Ok(vec![ScriptCommand::Action(CounterAction::Increment); times]);
            }
            ["advance", duration] => {
                ScriptCommand::Action(CounterAction::Advance(parse_duration(duration)?))
            }
            ["wait", duration] => ScriptCommand::Wait(parse_duration(duration)?),
            ["tick"] => ScriptCommand::Tick,
            ["start"] => ScriptCommand::Action(CounterAction::Start),
            ["stop"] => ScriptCommand::Action(CounterAction::Stop),
            ["toggle"] => ScriptCommand::Action(CounterAction::Toggle),
            ["reset", "counter"] => ScriptCommand::Action(CounterAction::ResetCounter),
            ["reset", "whole"] => ScriptCommand::Action(CounterAction::ResetWhole),
            ["expect", "count", n] => ScriptCommand::Expect(Expectation::Count(
                n.parse()
                    .map_err(|_| ScriptError::InvalidCommand(line.to_string()))?,
            )),
            ["expect", "moving", flag] => ScriptCommand::Expect(Expectation::Moving(
                flag.parse()
                    .map_err(|_| ScriptError::InvalidCommand(line.to_string()))?,
            )),
            ["expect", "passed", duration] => {
                ScriptCommand::Expect(Expectation::Passed(parse_duration(duration)?))
            }
            _ => return Err(ScriptError::InvalidCommand(line.to_string())),
        };

        Ok(vec![command])
    }

    /// Returns the next step, if any
    pub fn next_step(&mut self) -> Option<ScriptStep> {
        self.steps.pop_front()
    }

    /// Returns true if the script has more steps
    pub fn has_more(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Returns the number of remaining steps
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parses a duration string (e.g., "100ms", "1.5s") into milliseconds
pub fn parse_duration(s: &str) -> Result<f64, ScriptError> {
    let s = s.trim().to_lowercase();

    let millis = if let Some(ms_str) = s.strip_suffix("ms") {
        ms_str.trim().parse::<f64>().ok()
    } else if let Some(s_str) = s.strip_suffix('s') {
        s_str.trim().parse::<f64>().ok().map(|secs| secs * 1000.0)
    } else {
        None
    };

    match millis {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(ms),
        _ => Err(ScriptError::InvalidDelay(s)),
    }
}
