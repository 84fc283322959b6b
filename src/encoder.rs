//! This module renders a `Machine` back into the `.atm` description format.

use crate::machine::Machine;

/// Encodes a machine as a description that `parse` turns back into an equal machine.
///
/// Format:
/// - `Name:` and `Description:` metadata lines, when present.
/// - `Blank:` and `Start:` declarations.
/// - One `$state` block per declared state, sorted by name, each transition written as
///   `read:<symbol> write:<symbol> move:<direction> next:<state>` and sorted by read symbol.
///
/// Machines with a halting state other than `Halt` cannot be expressed in the format;
/// the halting state is dropped.
pub fn encode(machine: &Machine) -> String {
    let mut output = String::new();

    if !machine.name.is_empty() {
        output.push_str(&format!("Name: {}\n", machine.name));
    }
    for line in &machine.description {
        output.push_str(&format!("Description: {}\n", line));
    }

    output.push_str(&format!("Blank: {}\n", machine.blank));
    output.push_str(&format!("Start: {}\n", machine.initial_state));

    let mut names: Vec<&String> = machine.states.keys().collect();
    names.sort();

    for name in names {
        output.push('\n');
        output.push_str(&format!("${}\n", name));

        let mut transitions: Vec<_> = machine.states[name].transitions().collect();
        transitions.sort_by_key(|(read, _)| *read);

        for (read, transition) in transitions {
            output.push_str(&format!(
                "read:{} write:{} move:{} next:{}\n",
                read,
                transition.write,
                transition.direction.as_move(),
                transition.next_state
            ));
        }
    }

    output
}
