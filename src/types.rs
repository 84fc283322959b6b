//! This module defines the core data structures and types shared by the parser and the
//! executor: move directions, transitions, step outcomes and the error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// The identifier of the halting state. Entering it terminates execution.
pub const HALT_STATE: &str = "Halt";
/// The maximum allowed size for a machine description in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// Represents the possible directions the head can move after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Interprets a move token from a description.
    ///
    /// Only the exact words `Right` and `Left` move the head. Every other value,
    /// including an empty one, is treated as `Stay`.
    pub fn from_move(value: &str) -> Self {
        match value {
            "Right" => Direction::Right,
            "Left" => Direction::Left,
            _ => Direction::Stay,
        }
    }

    /// Returns the token used for this direction in a description.
    pub fn as_move(&self) -> &'static str {
        match self {
            Direction::Right => "Right",
            Direction::Left => "Left",
            Direction::Stay => "Stay",
        }
    }
}

/// A single transition rule, attached to a `(state, read symbol)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol written at the head.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
    /// The state the machine enters afterwards.
    pub next_state: String,
}

impl Transition {
    pub fn new(write: char, direction: Direction, next_state: impl Into<String>) -> Self {
        Self {
            write,
            direction,
            next_state: next_state.into(),
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the machine has not reached the halting state.
    Continue,
    /// The machine is in the halting state.
    Halt,
}

/// Represents the errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// No transition is defined for the current state and the symbol under the head.
    #[error("No transition defined for state {state} and symbol {symbol:?}")]
    UndefinedTransition { state: String, symbol: char },
    /// The machine entered a state that was never declared.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// The bounded runner reached its step ceiling before halting.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// Indicates an error during the parsing of a machine description.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid machine description.
    #[error("Description validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading description files.
    #[error("File error: {0}")]
    FileError(String),
}
