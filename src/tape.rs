//! This module defines `Tape`, the single read/write tape of the machine together with its
//! head position.
//!
//! The tape is conceptually infinite in both directions. Cells are materialized lazily:
//! reading past either end yields the blank symbol without growing the tape, while writes
//! and head movements grow it one blank cell at a time.

use crate::types::Direction;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape holding `input` with the head on its first cell.
    pub fn new(input: &str, blank: char) -> Self {
        Self {
            cells: input.chars().collect(),
            head: 0,
            blank,
        }
    }

    /// Returns the symbol under the head, or the blank symbol if the head is past the end.
    pub fn read(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(self.blank)
    }

    /// Writes `symbol` under the head, padding with blanks up to the head if needed.
    pub fn write(&mut self, symbol: char) {
        if self.head >= self.cells.len() {
            self.cells.resize(self.head + 1, self.blank);
        }

        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell.
    ///
    /// Moving right onto the end of the tape appends a blank cell. Moving left off the
    /// start prepends a blank cell and leaves the head at index 0.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Right => {
                self.head += 1;
                if self.head == self.cells.len() {
                    self.cells.push(self.blank);
                }
            }
            Direction::Left => {
                if self.head == 0 {
                    self.cells.insert(0, self.blank);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Stay => {}
        }
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Returns the tape contents with every blank cell removed.
    ///
    /// A blank symbol written on purpose is removed as well; it cannot be told apart
    /// from padding.
    pub fn output(&self) -> String {
        self.cells.iter().filter(|&&c| c != self.blank).collect()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.cells {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
