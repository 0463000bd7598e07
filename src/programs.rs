//! Built-in machines shipped with the crate, embedded at compile time and parsed on first use.

use crate::types::{Machine, NtmError};
use tracing::warn;

// Embedded machine definitions, keyed by the name used to select them.
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("abc_star", include_str!("../machines/abc_star.csv")),
    ("a_plus", include_str!("../machines/a_plus.csv")),
    ("contains_aa", include_str!("../machines/contains_aa.csv")),
];

lazy_static::lazy_static! {
    /// Built-in machines, parsed on first use.
    pub static ref PROGRAMS: Vec<(&'static str, Machine)> = PROGRAM_TEXTS
        .iter()
        .filter_map(|(key, text)| match crate::parser::parse(text) {
            Ok(machine) => Some((*key, machine)),
            Err(e) => {
                warn!(program = key, error = %e, "failed to parse built-in machine");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get a program by its key (`abc_star`) or its machine name (`abc star`)
    pub fn get_program_by_name(name: &str) -> Result<Machine, NtmError> {
        PROGRAMS
            .iter()
            .find(|(key, machine)| *key == name || machine.name == name)
            .map(|(_, machine)| machine.clone())
            .ok_or_else(|| NtmError::ProgramNotFound(name.to_string()))
    }

    /// List all program keys
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|(key, _)| key.to_string()).collect()
    }

    /// Get information about a program by its key
    pub fn get_program_info(name: &str) -> Result<ProgramInfo, NtmError> {
        let machine = Self::get_program_by_name(name)?;

        Ok(ProgramInfo {
            name: machine.name.clone(),
            start_state: machine.start_state.clone(),
            accept_state: machine.accept_state.clone(),
            reject_state: machine.reject_state.clone(),
            state_count: machine.states.len(),
            transition_count: machine.transitions.transition_count(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub name: String,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    pub state_count: usize,
    pub transition_count: usize,
}
