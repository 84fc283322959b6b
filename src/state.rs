//! This module defines `State`, the per-state transition table that maps a read symbol
//! to the `Transition` applied when the machine reads it.

use crate::types::{Direction, Transition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The transition table of a single named state.
///
/// Holds at most one transition per read symbol. Next-state names are not checked
/// here, so a transition may refer to a state that is declared later.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    table: HashMap<char, Transition>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the transition for `read`, replacing any earlier one.
    ///
    /// # Returns
    ///
    /// * `Some(Transition)` holding the replaced transition, if `read` already had one.
    /// * `None` if this is the first transition for `read`.
    pub fn add_transition(
        &mut self,
        read: char,
        write: char,
        direction: Direction,
        next_state: impl Into<String>,
    ) -> Option<Transition> {
        self.table
            .insert(read, Transition::new(write, direction, next_state))
    }

    /// Returns the transition for `read`, or `None` if the state defines none.
    pub fn lookup(&self, read: char) -> Option<&Transition> {
        self.table.get(&read)
    }

    /// Returns the number of read symbols this state handles.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates over `(read symbol, transition)` pairs in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, &Transition)> {
        self.table.iter().map(|(&read, transition)| (read, transition))
    }
}
