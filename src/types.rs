//! This module defines the core data structures and types used throughout the simulator,
//! including machine definitions, transitions, configurations, run results, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::TransitionTable;
use crate::Rule;

/// The blank symbol denoting an unwritten tape cell.
pub const BLANK_SYMBOL: char = '_';
/// The default bound on breadth-first levels before a run is abandoned.
pub const DEFAULT_MAX_DEPTH: usize = 10;
/// The default value of the (inert) transition bound.
pub const DEFAULT_MAX_TRANSITIONS: usize = 100;

/// An immutable nondeterministic Turing machine definition.
///
/// A machine is built once by a loader and never mutated while a simulation runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    /// The name of the machine, used for display only.
    pub name: String,
    /// Declared state names. Descriptive metadata, never validated.
    #[serde(default)]
    pub states: Vec<String>,
    /// Declared input alphabet. Descriptive metadata, never validated.
    #[serde(default)]
    pub input_alphabet: Vec<String>,
    /// Declared tape alphabet. Descriptive metadata, never validated.
    #[serde(default)]
    pub tape_alphabet: Vec<String>,
    /// The state the machine starts in.
    pub start_state: String,
    /// Reaching this state with an exhausted tape accepts the input.
    pub accept_state: String,
    /// Reaching this state kills the branch.
    pub reject_state: String,
    /// The blank symbol used when the head runs past the written tape.
    #[serde(default = "default_blank")]
    pub blank: char,
    /// The nondeterministic transition relation.
    pub transitions: TransitionTable,
}

fn default_blank() -> char {
    BLANK_SYMBOL
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

/// One possible outcome of reading a symbol in a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written under the head.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// A complete snapshot of the machine: the tape left of the head, the current state, and the
/// tape from the head onwards.
///
/// The first character of `right` is the symbol under the head. An empty `right` means the head
/// sits on a blank. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub left: String,
    pub state: String,
    pub right: String,
}

impl Configuration {
    pub fn new(
        left: impl Into<String>,
        state: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            left: left.into(),
            state: state.into(),
            right: right.into(),
        }
    }

    /// Builds the configuration a machine starts from: head on the first input symbol.
    pub fn initial(start_state: &str, input: &str) -> Self {
        Self::new("", start_state, input)
    }

    /// Returns the symbol under the head, or `blank` if the right segment is exhausted.
    pub fn head_symbol(&self, blank: char) -> char {
        self.right.chars().next().unwrap_or(blank)
    }

    /// Whether nothing but (at most) a single blank remains under and right of the head.
    pub fn is_tape_exhausted(&self, blank: char) -> bool {
        let mut chars = self.right.chars();
        match (chars.next(), chars.next()) {
            (None, _) => true,
            (Some(c), None) => c == blank,
            _ => false,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) [{}]", self.left, self.state, self.right)
    }
}

/// Why a run was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The input was empty (or only whitespace) and never entered the explorer.
    EmptyInput,
    /// No configuration in the frontier produced a new, unvisited successor.
    DeadFrontier,
}

/// The terminal outcome of a run. Exactly one is produced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
    DepthExceeded,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected(_) => write!(f, "rejected"),
            Verdict::DepthExceeded => write!(f, "execution stopped, hit max depth"),
        }
    }
}

/// Represents the outcome of advancing a simulation by one breadth-first level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The level was expanded and the next one is ready.
    Continue,
    /// The run has reached a terminal verdict.
    Halt(Verdict),
}

/// The result of one run together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub verdict: Verdict,
    /// Depth of the configuration tree at halt.
    pub depth: usize,
    /// Configurations inspected across all levels, revisits included. This is not a count of
    /// transitions actually applied.
    pub transitions: usize,
    /// Average number of configurations per level of the explored tree.
    pub nondeterminism: f64,
}

impl Summary {
    pub fn accepted(&self) -> bool {
        self.verdict.is_accepted()
    }
}

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Number of breadth-first levels explored before the run is abandoned.
    pub max_depth: usize,
    /// Recognized but never enforced; `max_depth` is the only stopping bound.
    pub max_transitions: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_transitions: DEFAULT_MAX_TRANSITIONS,
        }
    }
}

/// Represents various errors that can occur while loading machines or writing traces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NtmError {
    /// Indicates an error during the parsing of a machine definition.
    #[error("Machine parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a definition that parsed but lacks a required part.
    #[error("Machine definition error: {0}")]
    DefinitionError(String),
    /// Indicates an invalid batch manifest.
    #[error("Manifest error: {0}")]
    ManifestError(String),
    /// Indicates an error related to file system operations, such as a missing definition file.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates that the trace sink could not be written.
    #[error("Trace error: {0}")]
    TraceError(String),
    /// Indicates an unknown built-in machine.
    #[error("Program '{0}' not found")]
    ProgramNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let stay: Direction = serde_json::from_str(&stay_json).unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_configuration_display() {
        let config = Configuration::new("ab", "q1", "c");
        assert_eq!(config.to_string(), "[ab] (q1) [c]");
        assert_eq!(Configuration::initial("q0", "").to_string(), "[] (q0) []");
    }

    #[test]
    fn test_head_symbol() {
        assert_eq!(Configuration::new("", "q0", "xy").head_symbol('_'), 'x');
        assert_eq!(Configuration::new("xy", "q0", "").head_symbol('_'), '_');
    }

    #[test]
    fn test_tape_exhausted() {
        assert!(Configuration::new("a", "q", "").is_tape_exhausted('_'));
        assert!(Configuration::new("a", "q", "_").is_tape_exhausted('_'));
        assert!(!Configuration::new("a", "q", "__").is_tape_exhausted('_'));
        assert!(!Configuration::new("a", "q", "a").is_tape_exhausted('_'));
    }

    #[test]
    fn test_configuration_structural_equality() {
        use std::collections::HashSet;

        let mut visited = HashSet::new();
        visited.insert(Configuration::new("a", "q", "b"));
        assert!(visited.contains(&Configuration::new("a", "q", "b")));
        assert!(!visited.contains(&Configuration::new("a", "q", "")));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "accepted");
        assert_eq!(
            Verdict::Rejected(Rejection::DeadFrontier).to_string(),
            "rejected"
        );
        assert_eq!(
            Verdict::DepthExceeded.to_string(),
            "execution stopped, hit max depth"
        );
    }

    #[test]
    fn test_default_options() {
        let options = SimulationOptions::default();
        assert_eq!(options.max_depth, 10);
        assert_eq!(options.max_transitions, 100);
    }

    #[test]
    fn test_error_display() {
        let error = NtmError::FileError("missing.csv".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("File error"));
        assert!(error_msg.contains("missing.csv"));
    }
}
