//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::cli::InputArgs;
use crate::error::CliError;

/// Read the whole input document from the named file, or stdin for `-` or
/// no file.
pub fn read_input(input: &InputArgs) -> Result<String, CliError> {
    match input.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.display().to_string(),
                source,
            })
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read {
                    path: "stdin".into(),
                    source,
                })?;
            Ok(text)
        }
    }
}

/// Read and parse a JSON input document.
pub fn read_json(input: &InputArgs) -> Result<Value, CliError> {
    Ok(serde_json::from_str(&read_input(input)?)?)
}

/// `yes` / `no`, the way nmcli prints booleans.
pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.into()
}
