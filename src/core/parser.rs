//! Command line parsing.
//!
//! A command line is a whitespace separated list of tokens; the first token is
//! the command name and the rest are coerced into [`ArgValue`]s. Quotes and
//! `;` carry no meaning and stay part of the token they appear in.

use super::{ArgValue, ParseError};

/// A parsed command: name plus coerced arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The command name, case preserved.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<ArgValue>,
}

/// Parse a single command.
///
/// Runs of whitespace never produce empty arguments.
///
/// # Examples
///
/// ```
/// use debug_console::core::{parse_command_line, ArgValue};
///
/// let cmd = parse_command_line("collapse true").unwrap();
/// assert_eq!(cmd.name, "collapse");
/// assert_eq!(cmd.args, vec![ArgValue::Bool(true)]);
///
/// let cmd = parse_command_line("say don't 3").unwrap();
/// assert_eq!(cmd.args, vec![ArgValue::from("don't"), ArgValue::Int(3)]);
/// ```
pub fn parse_command_line(input: &str) -> Result<ParsedCommand, ParseError> {
    let mut tokens = input.split_whitespace();
    let name = tokens.next().ok_or(ParseError::EmptyInput)?;

    Ok(ParsedCommand {
        name: name.to_string(),
        args: tokens.map(ArgValue::coerce).collect(),
    })
}
