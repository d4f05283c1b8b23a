//! Error types for registration, parsing and execution.

use thiserror::Error;

/// Errors raised while registering commands or keywords, or resolving keywords.
///
/// Registration errors indicate a programming mistake (two systems claiming
/// the same name). They fail only the offending call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A command with this name already exists.
    #[error("command '{0}' is already registered")]
    DuplicateCommand(Box<str>),
    /// A keyword with this name already exists (names are case-insensitive).
    #[error("keyword '{0}' is already registered")]
    DuplicateKeyword(Box<str>),
    /// `resolve` was called with a token that is not a keyword.
    #[error("'{0}' is not a registered keyword")]
    NotAKeyword(String),
}

/// Why a command execution did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No command with this name is registered.
    #[error("Unknown command: {name}")]
    NotFound { name: String },
    /// The handler ran and reported failure (bad argument, unmet precondition).
    #[error("Invalid command: {name}")]
    Rejected { name: String },
    /// The command is already running further up the stack.
    #[error("Command '{name}' is already executing")]
    Busy { name: String },
    /// The command is registered but no handler is stored for it.
    #[error("Command '{name}' has no handler")]
    MissingHandler { name: String },
    /// The handler panicked. The handler is kept registered.
    #[error("Command '{name}' panicked: {message}")]
    Panicked { name: String, message: String },
}

impl ExecutionError {
    /// The name of the command that was attempted.
    pub fn name(&self) -> &str {
        match self {
            ExecutionError::NotFound { name }
            | ExecutionError::Rejected { name }
            | ExecutionError::Busy { name }
            | ExecutionError::MissingHandler { name }
            | ExecutionError::Panicked { name, .. } => name,
        }
    }
}

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("empty input")]
    EmptyInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_name() {
        let err = ExecutionError::Panicked {
            name: "boom".into(),
            message: "oops".into(),
        };
        assert_eq!(err.name(), "boom");
        assert_eq!(err.to_string(), "Command 'boom' panicked: oops");
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::DuplicateCommand("help".into());
        assert_eq!(err.to_string(), "command 'help' is already registered");
    }
}
