//! Sample machines bundled with the crate, parsed on first use and cached.

use crate::machine::Machine;
use crate::types::MachineError;

use std::sync::RwLock;

// Default embedded machines
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../machines/unary-increment.atm"),
    include_str!("../machines/binary-increment.atm"),
    include_str!("../machines/binary-complement.atm"),
    include_str!("../machines/unary-prepend.atm"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Machine>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded machines into `PROGRAMS`, unless that has already happened.
    pub fn load() -> Result<(), MachineError> {
        let mut write_guard = PROGRAMS
            .write()
            .map_err(|_| MachineError::FileError("Failed to acquire write lock".to_string()))?;

        if write_guard.is_empty() {
            *write_guard = parse_programs(&PROGRAM_TEXTS)?;
        }

        Ok(())
    }

    /// Get the number of available machines
    pub fn get_program_count() -> Result<usize, MachineError> {
        Self::load()?;

        Ok(PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .len())
    }

    /// Get a machine by its index
    pub fn get_program_by_index(index: usize) -> Result<Machine, MachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a machine by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Machine, MachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|machine| machine.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all machine names
    pub fn list_program_names() -> Result<Vec<String>, MachineError> {
        Self::load()?;

        Ok(PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .map(|machine| machine.name.clone())
            .collect())
    }

    /// Get the original description text of a machine by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, MachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            MachineError::ValidationError(format!("Program text index {} out of range", index))
        })
    }
}

fn parse_programs(texts: &[&str]) -> Result<Vec<Machine>, MachineError> {
    texts.iter().map(|text| crate::parser::parse(text)).collect()
}
