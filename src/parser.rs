//! This module provides the parser for `.atm` machine descriptions, utilizing the `pest` crate.
//! It defines the grammar in `grammar.pest` and turns a parsed description into a `Machine`.

use crate::{
    machine::Machine,
    state::State,
    types::{Direction, MachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses a machine description into a `Machine`.
///
/// The description must declare `Blank:` and `Start:`. A repeated `Name:`, `Blank:`,
/// `Start:` or `$state` declaration replaces the earlier one. Lines outside state blocks
/// that are not declarations are ignored. State blocks may refer to states that are
/// declared later, or never; unknown next states are only reported when the machine
/// enters them. The halting state is always `Halt` and is not declared.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine description.
///
/// # Returns
///
/// * `Ok(Machine)` if the input is successfully parsed.
/// * `Err(MachineError::ParseError)` if there are syntax errors inside a state block.
/// * `Err(MachineError::ValidationError)` if a required declaration is missing.
pub fn parse(input: &str) -> Result<Machine, MachineError> {
    let root = DescriptionParser::parse(Rule::program, input)
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty description".to_string()))?;

    parse_program(root)
}

/// Parses the top-level structure of a description from a `Pair<Rule::program>`.
fn parse_program(pair: Pair<Rule>) -> Result<Machine, MachineError> {
    let mut name: Option<String> = None;
    let mut description = Vec::new();
    let mut blank: Option<char> = None;
    let mut initial_state: Option<String> = None;
    let mut states = HashMap::new();

    for p in pair.into_inner() {
        let span = p.as_span();

        match p.as_rule() {
            Rule::name => {
                let value = inner_str(p).trim().to_string();
                replace_declaration(&mut name, value, "Name");
            }
            Rule::description => description.push(inner_str(p).trim().to_string()),
            Rule::blank => {
                let value = parse_symbol(inner_str(p), span)?;
                replace_declaration(&mut blank, value, "Blank");
            }
            Rule::start => {
                let value = inner_str(p).to_string();
                replace_declaration(&mut initial_state, value, "Start");
            }
            Rule::state_block => {
                let (state_name, state) = parse_state_block(p)?;

                if states.insert(state_name.clone(), state).is_some() {
                    warn!(
                        state = %state_name,
                        "duplicate state declaration, keeping the later block"
                    );
                }
            }
            Rule::other_line => {
                debug!(line = span.start_pos().line_col().0, "ignoring unrecognised line");
            }
            _ => {} // EOI
        }
    }

    let blank = check_required_rule(blank, "Blank")?;
    let initial_state = check_required_rule(initial_state, "Start")?;

    let mut machine = Machine::new(blank, initial_state).with_name(name.unwrap_or_default());
    machine.description = description;
    machine.states = states;

    Ok(machine)
}

/// Stores a single-valued declaration, warning when it replaces an earlier one.
fn replace_declaration<T: std::fmt::Debug>(slot: &mut Option<T>, value: T, label: &str) {
    if let Some(previous) = slot.replace(value) {
        warn!(
            declaration = label,
            previous = ?previous,
            "duplicate declaration, keeping the later value"
        );
    }
}

/// Parses a `$name` header and its transitions from a `Pair<Rule::state_block>`.
///
/// A read symbol declared twice keeps the later transition.
fn parse_state_block(pair: Pair<Rule>) -> Result<(String, State), MachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let name = pairs
        .next()
        .ok_or_else(|| parse_error("Missing state name", span))?
        .as_str()
        .to_string();

    let mut state = State::new();

    for transition in pairs.filter(|p| p.as_rule() == Rule::transition) {
        let span = transition.as_span();
        let mut fields = transition.into_inner();
        let mut field = || {
            fields
                .next()
                .map(inner_str)
                .ok_or_else(|| parse_error("Incomplete transition", span))
        };

        let read = parse_symbol(field()?, span)?;
        let write = parse_symbol(field()?, span)?;
        let direction = Direction::from_move(field()?);
        let next_state = field()?;

        if state
            .add_transition(read, write, direction, next_state)
            .is_some()
        {
            warn!(
                state = %name,
                read = %read,
                "duplicate transition, keeping the later declaration"
            );
        }
    }

    Ok((name, state))
}

/// Takes the first character of a symbol token.
fn parse_symbol(token: &str, span: Span) -> Result<char, MachineError> {
    token
        .chars()
        .next()
        .ok_or_else(|| parse_error("Missing symbol", span))
}

/// Extracts the string of the first inner `Pair`, or an empty string if there is none.
fn inner_str(pair: Pair<'_, Rule>) -> &str {
    pair.into_inner().next().map(|p| p.as_str()).unwrap_or("")
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a required declaration is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, label: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing '{label}:' declaration")))
}
