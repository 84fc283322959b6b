//! This crate provides a single-tape deterministic Turing Machine interpreter.
//! It includes modules for parsing `.atm` machine descriptions, executing machines against
//! input strings, checking descriptions before running them, and a set of bundled machines.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod state;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `encode` function from the encoder module.
pub use encoder::encode;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `Machine` and `Execution` structs from the machine module.
pub use machine::{Execution, Machine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{ProgramManager, PROGRAMS};
pub use state::State;
pub use tape::Tape;
/// Re-exports the shared types from the types module.
pub use types::{Direction, MachineError, Step, Transition, HALT_STATE, MAX_PROGRAM_SIZE};
