//! This module defines `Machine`, a single-tape deterministic Turing Machine, and
//! `Execution`, the step-by-step driver that runs a machine against one input.
//!
//! A `Machine` is built once (usually by the parser) and never changes afterwards. Every
//! run gets its own `Execution`, which owns the tape, the head and the current state, so
//! one machine can serve any number of runs, including concurrent ones.

use crate::state::State;
use crate::tape::Tape;
use crate::types::{MachineError, Step, HALT_STATE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A single-tape Turing Machine: its named states, blank symbol, and start and halt states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// The name of the machine, taken from the `Name:` line. Not used during execution.
    pub name: String,
    /// Free-form `Description` lines. Not used during execution.
    pub description: Vec<String>,
    /// The symbol that fills every cell that was never written.
    pub blank: char,
    /// The state execution starts in.
    pub initial_state: String,
    /// The state whose entry terminates execution. It needs no transition table.
    pub halting_state: String,
    /// The transition table of every declared state, keyed by state name.
    pub states: HashMap<String, State>,
}

impl Machine {
    /// Creates a machine without states that halts in [`HALT_STATE`].
    pub fn new(blank: char, initial_state: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            description: Vec::new(),
            blank,
            initial_state: initial_state.into(),
            halting_state: HALT_STATE.to_string(),
            states: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a state, replacing any earlier state with the same name.
    pub fn add_state(&mut self, name: impl Into<String>, state: State) -> Option<State> {
        self.states.insert(name.into(), state)
    }

    /// Returns the transition table of the named state.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Creates a fresh execution of this machine on `input`.
    pub fn start(&self, input: &str) -> Execution<'_> {
        Execution {
            machine: self,
            state: &self.initial_state,
            tape: Tape::new(input, self.blank),
            step_count: 0,
        }
    }

    /// Runs the machine on `input` until it reaches the halting state.
    ///
    /// There is no step ceiling: a machine that never halts makes this call run forever.
    /// Use [`Machine::execute_bounded`] when the description is not trusted.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the final tape contents, every blank symbol removed.
    /// * `Err(MachineError::UndefinedTransition)` if the current state has no transition
    ///   for the symbol under the head.
    /// * `Err(MachineError::UnknownState)` if the machine enters an undeclared state.
    pub fn execute(&self, input: &str) -> Result<String, MachineError> {
        let mut execution = self.start(input);
        debug!(
            initial_state = %self.initial_state,
            input_len = input.chars().count(),
            "starting execution"
        );

        execution.run()?;

        debug!(steps = execution.step_count(), "execution halted");
        Ok(execution.output())
    }

    /// Runs the machine on `input`, applying at most `max_steps` transitions.
    ///
    /// Behaves like [`Machine::execute`], except that a machine still running after
    /// `max_steps` transitions fails with `MachineError::StepLimitExceeded`.
    pub fn execute_bounded(&self, input: &str, max_steps: usize) -> Result<String, MachineError> {
        let mut execution = self.start(input);
        debug!(
            initial_state = %self.initial_state,
            max_steps,
            "starting bounded execution"
        );

        execution.run_bounded(max_steps)?;

        debug!(steps = execution.step_count(), "execution halted");
        Ok(execution.output())
    }
}

/// One run of a `Machine` against a single input.
///
/// Borrows the machine immutably and owns everything that changes while running.
#[derive(Debug, Clone)]
pub struct Execution<'m> {
    machine: &'m Machine,
    state: &'m str,
    tape: Tape,
    step_count: usize,
}

impl<'m> Execution<'m> {
    /// Executes a single read, write and move.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was applied.
    /// * `Ok(Step::Halt)` if the machine was already in the halting state. Nothing changes.
    /// * `Err(MachineError)` if the current state is unknown or has no transition for the
    ///   symbol under the head. The execution is left as it was before the call.
    pub fn step(&mut self) -> Result<Step, MachineError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let machine = self.machine;
        let state = machine
            .states
            .get(self.state)
            .ok_or_else(|| MachineError::UnknownState(self.state.to_string()))?;

        let symbol = self.tape.read();
        let transition =
            state
                .lookup(symbol)
                .ok_or_else(|| MachineError::UndefinedTransition {
                    state: self.state.to_string(),
                    symbol,
                })?;

        trace!(
            step = self.step_count,
            state = self.state,
            head = self.tape.head(),
            read = %symbol,
            write = %transition.write,
            next = %transition.next_state,
            "applying transition"
        );

        self.tape.write(transition.write);
        self.tape.shift(transition.direction);
        self.state = &transition.next_state;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Steps until the machine halts or an error occurs.
    pub fn run(&mut self) -> Result<(), MachineError> {
        while self.step()? == Step::Continue {}
        Ok(())
    }

    /// Steps until the machine halts, failing once `max_steps` transitions have been
    /// applied without reaching the halting state.
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<(), MachineError> {
        for _ in 0..max_steps {
            if self.step()? == Step::Halt {
                return Ok(());
            }
        }

        if self.is_halted() {
            Ok(())
        } else {
            Err(MachineError::StepLimitExceeded(max_steps))
        }
    }

    /// Returns the current state name.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Checks whether the machine is in its halting state.
    pub fn is_halted(&self) -> bool {
        self.state == self.machine.halting_state
    }

    pub fn head(&self) -> usize {
        self.tape.head()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the current tape contents with every blank symbol removed.
    pub fn output(&self) -> String {
        self.tape.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn state(transitions: &[(char, char, Direction, &str)]) -> State {
        let mut state = State::new();
        for &(read, write, direction, next) in transitions {
            state.add_transition(read, write, direction, next);
        }
        state
    }

    /// Writes `1` over a `0` or a blank and halts.
    fn unary_increment() -> Machine {
        let mut machine = Machine::new('_', "A").with_name("Unary Increment");
        machine.add_state(
            "A",
            state(&[
                ('0', '1', Direction::Right, "Halt"),
                ('_', '1', Direction::Right, "Halt"),
            ]),
        );
        machine
    }

    #[test]
    fn test_machine_creation() {
        let machine = unary_increment();

        assert_eq!(machine.initial_state, "A");
        assert_eq!(machine.halting_state, HALT_STATE);
        assert_eq!(machine.blank, '_');
        assert!(machine.state("A").is_some());
        assert!(machine.state("Halt").is_none());
    }

    #[test]
    fn test_halt_correctness() {
        let machine = unary_increment();

        assert_eq!(machine.execute("0").unwrap(), "1");
    }

    #[test]
    fn test_empty_input_reads_blank() {
        let machine = unary_increment();

        assert_eq!(machine.execute("").unwrap(), "1");
    }

    #[test]
    fn test_blank_stripping_after_right_growth() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('1', '1', Direction::Right, "B")]));
        machine.add_state("B", state(&[('_', '_', Direction::Right, "C")]));
        machine.add_state("C", state(&[('_', '_', Direction::Right, "D")]));
        machine.add_state("D", state(&[('_', '_', Direction::Right, "E")]));
        machine.add_state("E", state(&[('_', '_', Direction::Right, "Halt")]));

        let mut execution = machine.start("1");
        execution.run().unwrap();

        assert_eq!(execution.head(), 5);
        assert_eq!(execution.tape().to_string(), "1_____");
        assert_eq!(execution.output(), "1");
        assert_eq!(machine.execute("1").unwrap(), "1");
    }

    #[test]
    fn test_left_growth_keeps_marker_order() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('x', 'x', Direction::Left, "B")]));
        machine.add_state("B", state(&[('_', 'a', Direction::Left, "C")]));
        machine.add_state("C", state(&[('_', 'b', Direction::Left, "D")]));
        machine.add_state("D", state(&[('_', 'c', Direction::Stay, "Halt")]));

        let mut execution = machine.start("x");
        execution.run().unwrap();

        assert_eq!(execution.head(), 0);
        assert_eq!(execution.tape().cells(), &['c', 'b', 'a', 'x']);
        assert_eq!(machine.execute("x").unwrap(), "cbax");
    }

    #[test]
    fn test_repeated_execution_is_independent() {
        let mut machine = Machine::new('_', "A");
        // Walks right over the input, then appends a `1`.
        machine.add_state(
            "A",
            state(&[
                ('1', '1', Direction::Right, "A"),
                ('_', '1', Direction::Left, "Halt"),
            ]),
        );

        let first = machine.execute("111").unwrap();
        let second = machine.execute("111").unwrap();

        assert_eq!(first, "1111");
        assert_eq!(first, second);
        assert_eq!(machine.execute("1").unwrap(), "11");
    }

    #[test]
    fn test_undefined_transition_fails() {
        let machine = unary_increment();

        let error = machine.execute("1").unwrap_err();
        assert_eq!(
            error,
            MachineError::UndefinedTransition {
                state: "A".to_string(),
                symbol: '1',
            }
        );
    }

    #[test]
    fn test_unknown_next_state_fails_on_entry() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('0', '0', Direction::Right, "Nowhere")]));

        let mut execution = machine.start("0");
        assert_eq!(execution.step().unwrap(), Step::Continue);
        assert_eq!(execution.state(), "Nowhere");

        assert_eq!(
            execution.step().unwrap_err(),
            MachineError::UnknownState("Nowhere".to_string())
        );
        assert_eq!(execution.step_count(), 1);
    }

    #[test]
    fn test_undeclared_initial_state_fails() {
        let machine = Machine::new('_', "Missing");

        assert_eq!(
            machine.execute("0").unwrap_err(),
            MachineError::UnknownState("Missing".to_string())
        );
    }

    #[test]
    fn test_zero_step_machine() {
        let machine = Machine::new('_', HALT_STATE);

        let mut execution = machine.start("_a_b_");
        assert!(execution.is_halted());
        assert_eq!(execution.step().unwrap(), Step::Halt);
        assert_eq!(execution.step_count(), 0);

        assert_eq!(machine.execute("_a_b_").unwrap(), "ab");
    }

    #[test]
    fn test_written_blank_is_stripped() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('a', '_', Direction::Right, "B")]));
        machine.add_state("B", state(&[('b', 'b', Direction::Stay, "Halt")]));

        assert_eq!(machine.execute("ab").unwrap(), "b");
    }

    #[test]
    fn test_stay_rewrites_in_place() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('a', 'b', Direction::Stay, "B")]));
        machine.add_state("B", state(&[('b', 'c', Direction::Stay, "Halt")]));

        let mut execution = machine.start("a");
        execution.run().unwrap();

        assert_eq!(execution.head(), 0);
        assert_eq!(execution.step_count(), 2);
        assert_eq!(execution.output(), "c");
    }

    #[test]
    fn test_step_by_step() {
        let machine = unary_increment();
        let mut execution = machine.start("0");

        assert_eq!(execution.state(), "A");
        assert!(!execution.is_halted());

        assert_eq!(execution.step().unwrap(), Step::Continue);
        assert_eq!(execution.state(), "Halt");
        assert_eq!(execution.head(), 1);
        assert_eq!(execution.tape().cells(), &['1', '_']);
        assert!(execution.is_halted());

        assert_eq!(execution.step().unwrap(), Step::Halt);
        assert_eq!(execution.step_count(), 1);
    }

    #[test]
    fn test_bounded_execution_stops_runaway_machine() {
        let mut machine = Machine::new('_', "A");
        machine.add_state("A", state(&[('_', '_', Direction::Right, "A")]));

        assert_eq!(
            machine.execute_bounded("", 100).unwrap_err(),
            MachineError::StepLimitExceeded(100)
        );
    }

    #[test]
    fn test_bounded_execution_allows_exact_step_count() {
        let machine = unary_increment();

        assert_eq!(machine.execute_bounded("0", 1).unwrap(), "1");
        assert_eq!(
            machine.execute_bounded("0", 0).unwrap_err(),
            MachineError::StepLimitExceeded(0)
        );
    }

    #[test]
    fn test_concurrent_executions_share_machine() {
        let machine = &unary_increment();

        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["0", "", "0"]
                .into_iter()
                .map(|input| scope.spawn(move || machine.execute(input).unwrap()))
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(outputs, vec!["1", "1", "1"]);
    }
}
