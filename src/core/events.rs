//! Console events for communication between layers.
//!
//! Events are the primary mechanism for:
//! - Hosts -> Core: raw command lines
//! - Anything -> Core: lines to show in the console
//! - Core -> Systems: failed commands, open/close, refreshed view

use bevy::prelude::*;

use super::{ArgValue, ExecutionError, LogSeverity};

/// Event sent when a command line is submitted to the console.
///
/// The console parses the line into a command name and arguments and
/// executes it.
///
/// # Examples
///
/// ```ignore
/// fn submit_command(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("collapse true"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw command line.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Event sent when a line should be appended to the console log.
///
/// # Examples
///
/// ```ignore
/// fn log_to_console(mut events: MessageWriter<ConsoleOutputEvent>) {
///     events.write(ConsoleOutputEvent::info("Game started"));
///     events.write(ConsoleOutputEvent::error("Failed to load level").with_body("level.ron"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleOutputEvent {
    /// First line.
    pub header: String,
    /// Detail text, may be empty.
    pub body: String,
    /// Severity.
    pub severity: LogSeverity,
}

impl ConsoleOutputEvent {
    /// Create a new output event.
    pub fn new(header: impl Into<String>, body: impl Into<String>, severity: LogSeverity) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            severity,
        }
    }

    /// Create an info line.
    pub fn info(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Info)
    }

    /// Create a warning line.
    pub fn warning(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Warning)
    }

    /// Create an error line.
    pub fn error(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Error)
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Event sent when a command could not be executed or reported failure.
///
/// # Examples
///
/// ```ignore
/// fn count_failures(mut events: MessageReader<CommandFailedEvent>) {
///     for event in events.read() {
///         warn!("{} failed: {}", event.name(), event.error);
///     }
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct CommandFailedEvent {
    /// What went wrong.
    pub error: ExecutionError,
    /// The arguments the command was called with.
    pub args: Vec<ArgValue>,
}

impl CommandFailedEvent {
    /// Create a new failure event.
    pub fn new(error: ExecutionError, args: Vec<ArgValue>) -> Self {
        Self { error, args }
    }

    /// The name of the command that failed.
    pub fn name(&self) -> &str {
        self.error.name()
    }

    /// The command line as it was attempted: name followed by arguments.
    pub fn command_line(&self) -> String {
        let mut line = self.name().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string());
        }
        line
    }
}

/// Event sent when the console is opened or closed.
#[derive(Message, Debug, Clone, Copy)]
pub struct ConsoleToggleEvent {
    /// Whether the console is now open.
    pub open: bool,
}

impl ConsoleToggleEvent {
    /// Console was opened.
    pub fn opened() -> Self {
        Self { open: true }
    }

    /// Console was closed.
    pub fn closed() -> Self {
        Self { open: false }
    }
}

/// Event sent after the console view snapshot has been rebuilt.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleRefreshEvent;

/// Plugin that registers all console events.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<CommandFailedEvent>()
            .add_message::<ConsoleToggleEvent>()
            .add_message::<ConsoleRefreshEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event() {
        let event = ConsoleInputEvent::new("help clear");
        assert_eq!(event.command, "help clear");
    }

    #[test]
    fn test_output_event_constructors() {
        let event = ConsoleOutputEvent::info("hello");
        assert_eq!(event.severity, LogSeverity::Info);
        assert!(event.body.is_empty());

        let event = ConsoleOutputEvent::error("oops").with_body("src/lib.rs:10");
        assert_eq!(event.severity, LogSeverity::Error);
        assert_eq!(event.body, "src/lib.rs:10");

        assert_eq!(ConsoleOutputEvent::warning("w").severity, LogSeverity::Warning);
    }

    #[test]
    fn test_failed_event_command_line() {
        let event = CommandFailedEvent::new(
            ExecutionError::NotFound { name: "tp".into() },
            vec![ArgValue::Int(3), ArgValue::from("home"), ArgValue::Bool(true)],
        );
        assert_eq!(event.name(), "tp");
        assert_eq!(event.command_line(), "tp 3 home true");
    }

    #[test]
    fn test_toggle_event() {
        assert!(ConsoleToggleEvent::opened().open);
        assert!(!ConsoleToggleEvent::closed().open);
    }
}
