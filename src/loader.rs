//! This module provides the `ProgramLoader` struct, responsible for loading machine definitions
//! from files and strings.

use crate::parser::parse;
use crate::types::{Machine, NtmError};
use std::fs;
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading machine definitions.
///
/// Tabular text (`.csv`, `.tm`) goes through the definition parser; `.json` files are read as a
/// serialized `Machine`.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read and parsed.
    /// * `Err(NtmError::FileError)` if the file does not exist or cannot be read.
    /// * `Err(NtmError::ParseError)` or `Err(NtmError::DefinitionError)` if the content is not a
    ///   valid definition.
    pub fn load_machine(path: &Path) -> Result<Machine, NtmError> {
        if !path.exists() {
            return Err(NtmError::FileError(format!(
                "File '{}' not found",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            NtmError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::load_machine_from_json(&content)
        } else {
            Self::load_machine_from_string(&content)
        }
    }

    /// Loads a machine from tabular definition text.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, NtmError> {
        parse(content)
    }

    /// Loads a machine from its JSON serialization.
    pub fn load_machine_from_json(content: &str) -> Result<Machine, NtmError> {
        serde_json::from_str(content)
            .map_err(|e| NtmError::DefinitionError(format!("Invalid JSON definition: {e}")))
    }
}
