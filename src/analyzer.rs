//! This module provides an optional pre-flight check for machines. The executor discovers
//! unknown states lazily, when it enters them; `analyze` reports them before running.

use crate::machine::Machine;
use crate::types::MachineError;
use std::collections::HashSet;

/// Represents the problems `analyze` can find in a machine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the initial state is neither declared nor the halting state.
    InvalidStartState(String),
    /// Indicates transitions whose next state is neither declared nor the halting state.
    UndefinedNextStates(Vec<String>),
    /// Indicates structural problems with the machine.
    StructuralError(String),
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into a `MachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                MachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedNextStates(transitions) => MachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::StructuralError(msg) => MachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a `Machine` for references to states that do not exist.
///
/// Unreachable states and missing transitions are not reported.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError::ValidationError)` describing the first problem found.
pub fn analyze(machine: &Machine) -> Result<(), MachineError> {
    [
        check_structure,
        check_valid_start_state,
        check_undefined_next_states,
    ]
    .iter()
    .find_map(|check| check(machine).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

/// Checks that the halting state does not declare transitions, since they can never run.
fn check_structure(machine: &Machine) -> Result<(), AnalysisError> {
    match machine.state(&machine.halting_state) {
        Some(state) if !state.is_empty() => Err(AnalysisError::StructuralError(format!(
            "Halting state {} declares transitions that can never run",
            machine.halting_state
        ))),
        _ => Ok(()),
    }
}

/// Checks whether the initial state is declared, or is the halting state itself.
fn check_valid_start_state(machine: &Machine) -> Result<(), AnalysisError> {
    if machine.initial_state != machine.halting_state
        && !machine.states.contains_key(&machine.initial_state)
    {
        return Err(AnalysisError::InvalidStartState(
            machine.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that every `next_state` is declared or is the halting state.
///
/// Each offending transition is reported as `state[read] -> next`, sorted.
fn check_undefined_next_states(machine: &Machine) -> Result<(), AnalysisError> {
    let defined_states: HashSet<&str> = machine.states.keys().map(String::as_str).collect();

    let mut undefined_transitions: Vec<String> = machine
        .states
        .iter()
        .flat_map(|(name, state)| {
            state
                .transitions()
                .map(move |(read, transition)| (name, read, transition))
        })
        .filter(|(_, _, transition)| {
            transition.next_state != machine.halting_state
                && !defined_states.contains(transition.next_state.as_str())
        })
        .map(|(name, read, transition)| format!("{}[{}] -> {}", name, read, transition.next_state))
        .collect();

    if !undefined_transitions.is_empty() {
        undefined_transitions.sort(); // Sort for deterministic output
        return Err(AnalysisError::UndefinedNextStates(undefined_transitions));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use crate::types::{Direction, HALT_STATE};

    fn create_test_machine(initial_state: &str, states: &[(&str, char, &str)]) -> Machine {
        let mut machine = Machine::new('_', initial_state);
        for &(name, read, next) in states {
            machine
                .states
                .entry(name.to_string())
                .or_insert_with(State::new)
                .add_transition(read, read, Direction::Right, next);
        }
        machine
    }

    #[test]
    fn test_valid_machine() {
        let machine = create_test_machine("A", &[("A", '0', "B"), ("B", '_', "Halt")]);

        assert!(analyze(&machine).is_ok());
    }

    #[test]
    fn test_start_in_halting_state_is_valid() {
        let machine = Machine::new('_', HALT_STATE);

        assert!(analyze(&machine).is_ok());
    }

    #[test]
    fn test_invalid_start_state() {
        let machine = create_test_machine("Missing", &[("A", '0', "Halt")]);

        assert_eq!(
            check_valid_start_state(&machine),
            Err(AnalysisError::InvalidStartState("Missing".to_string()))
        );

        let error = analyze(&machine).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Description validation error: Invalid start state: Missing"
        );
    }

    #[test]
    fn test_undefined_next_states() {
        let machine = create_test_machine(
            "A",
            &[("A", '0', "Nowhere"), ("A", '1', "B"), ("B", '_', "Gone")],
        );

        assert_eq!(
            check_undefined_next_states(&machine),
            Err(AnalysisError::UndefinedNextStates(vec![
                "A[0] -> Nowhere".to_string(),
                "B[_] -> Gone".to_string(),
            ]))
        );
        assert!(matches!(
            analyze(&machine),
            Err(MachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_halting_state_with_transitions() {
        let machine = create_test_machine("A", &[("A", '0', "Halt"), ("Halt", '1', "A")]);

        assert!(matches!(
            check_structure(&machine),
            Err(AnalysisError::StructuralError(_))
        ));
    }

    #[test]
    fn test_analysis_does_not_change_execution() {
        let machine = create_test_machine("A", &[("A", '0', "Nowhere")]);

        assert!(analyze(&machine).is_err());
        assert_eq!(
            machine.execute("0").unwrap_err(),
            MachineError::UnknownState("Nowhere".to_string())
        );
    }
}
