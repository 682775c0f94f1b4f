//! Splitting of a raw command string into program name and parameters.

use crate::error::{ExecError, Result};

/// A command string split into the tool to run and its raw parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: String,
    pub parameters: String,
}

/// Split `command` into its leading program token and the remaining
/// parameters, joined by single spaces.
///
/// # Errors
///
/// Returns a format error unless the command has at least two
/// whitespace-separated tokens.
pub fn split_command(command: &str) -> Result<ParsedCommand> {
    let mut parts = command.split_whitespace();

    let (Some(program), Some(first_param)) = (parts.next(), parts.next()) else {
        return Err(ExecError::format(format!(
            "command must be in the form '<cli> <parameters>', got '{}'",
            command.trim()
        )));
    };

    let parameters = std::iter::once(first_param)
        .chain(parts)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ParsedCommand {
        program: program.to_string(),
        parameters,
    })
}
