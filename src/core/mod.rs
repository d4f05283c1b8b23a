//! Core console functionality.
//!
//! This module contains the core types that don't depend on any UI backend:
//! - [`CommandRegistry`] / [`CommandHandlers`]: commands and keywords
//! - [`LineBuffer`]: the bounded, collapsible log
//! - [`InputLine`]: the input editor with autocomplete
//! - [`Console`]: system parameter tying them together

pub mod command;
pub mod console;
pub mod error;
pub mod events;
pub mod execute;
pub mod index;
pub mod input;
pub mod line_buffer;
pub mod parser;
pub mod refresh;
pub mod registry;
pub mod value;

pub use command::{ArgSlot, Command, CommandArgs, CommandHandler, CommandMeta};
pub use console::{Console, ConsoleInput, ConsoleLog, ConsoleView};
pub use error::{ExecutionError, ParseError, RegistryError};
pub use events::{
    CommandFailedEvent, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent, ConsoleRefreshEvent,
    ConsoleToggleEvent,
};
pub use execute::{execute_command, try_execute_command};
pub use index::NameIndex;
pub use input::{InputLine, MAX_HISTORY};
pub use line_buffer::{LineBuffer, LogLine, LogSeverity};
pub use parser::{ParsedCommand, parse_command_line};
pub use refresh::{DEFAULT_REFRESH_DELAY, RefreshDebounce};
pub use registry::{CommandHandlers, CommandRegistry, KeywordMode, KeywordResolver, register_command};
pub use value::ArgValue;
