//! An in-game debug console for Bevy.
//!
//! debug_console provides:
//!
//! - **Commands**: named handlers with typed argument slots
//! - **Keywords**: lazily expanded placeholders for help and autocomplete
//! - **Log**: a bounded, newest-first line buffer that can collapse duplicates
//! - **Input**: a single-line editor with autocomplete and history
//!
//! # Features
//!
//! - `egui` (default): egui-based UI with log capture
//! - `capture`: forward `tracing` records into the console log
//! - `terminal`: stdin/stdout backend for headless builds
//! - `persist`: RON preferences plus the `exec` and `writeconfig` commands
//! - `full`: Enable egui + persist
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use debug_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::default())
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     console.register_cmd(
//!         Command::new("god", |args, world| {
//!             let Some(enabled) = args.bool(0) else { return false };
//!             world.resource_mut::<Cheats>().god = enabled;
//!             true
//!         })
//!         .description("Toggle invulnerability")
//!         .arg(ArgSlot::new([true, false])),
//!     );
//! }
//! ```

use std::time::Duration;

use bevy::prelude::*;

// Core module (always available)
pub mod core;

pub use core::{
    ArgSlot, ArgValue, Command, CommandArgs, CommandFailedEvent, CommandHandler, CommandHandlers, CommandMeta,
    CommandRegistry, Console, ConsoleEventsPlugin, ConsoleInput, ConsoleInputEvent, ConsoleLog, ConsoleOutputEvent,
    ConsoleRefreshEvent, ConsoleToggleEvent, ConsoleView, ExecutionError, InputLine, KeywordMode, LineBuffer,
    LogLine, LogSeverity, ParseError, RefreshDebounce, RegistryError, execute_command, parse_command_line,
    register_command,
};

// Log capture (feature-gated)
#[cfg(feature = "capture")]
pub mod logging;

// UI modules (feature-gated)
#[cfg(feature = "egui")]
pub mod config;
#[cfg(feature = "egui")]
pub mod ui;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

// Re-exports
#[cfg(feature = "egui")]
pub use config::{ConsoleConfig, ConsoleTheme};

#[cfg(feature = "persist")]
pub use persist::{ConsolePrefs, PrefsError, PrefsPath};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::ConsolePlugin;
    pub use crate::core::{
        ArgSlot, ArgValue, Command, CommandArgs, CommandFailedEvent, CommandRegistry, Console, ConsoleInputEvent,
        ConsoleOutputEvent, KeywordMode, LogSeverity,
    };
}

/// Keyword expanding to every registered command name.
pub const COMMAND_KEYWORD: &str = "$command";

/// Header of the `help` command list.
pub const HELP_LIST_HEADER: &str = "---Command List---";

/// Main console plugin.
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin {
///     line_capacity: 500,
///     collapse_lines: true,
///     ..default()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConsolePlugin {
    /// Maximum number of lines kept in the log.
    pub line_capacity: usize,
    /// How long the view waits after a change before refreshing.
    pub refresh_delay: Duration,
    /// Whether duplicate lines start out collapsed.
    pub collapse_lines: bool,
}

impl Default for ConsolePlugin {
    fn default() -> Self {
        Self {
            line_capacity: 1000,
            refresh_delay: core::DEFAULT_REFRESH_DELAY,
            collapse_lines: false,
        }
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let mut buffer = LineBuffer::new(self.line_capacity);
        buffer.set_collapsing(self.collapse_lines);

        // Core: Always register the registry, handlers, log and events
        app.init_resource::<CommandRegistry>()
            .init_resource::<CommandHandlers>()
            .init_resource::<PendingCommands>()
            .init_resource::<ConsoleInput>()
            .init_resource::<ConsoleView>()
            .insert_resource(ConsoleLog::new(buffer, RefreshDebounce::new(self.refresh_delay)))
            .add_plugins(core::ConsoleEventsPlugin);

        // Register built-in commands
        app.add_systems(Startup, register_builtin_commands);

        // 1. append_output_events: Lines written by other systems
        // 2. parse_console_input: Read input events, parse, queue commands
        // 3. execute_pending_commands: Execute commands with exclusive World access
        // 4. report_failed_commands: Failure notifications become error lines
        // 5. refresh_console_view: Debounced snapshot for the hosts
        app.add_systems(
            Update,
            (
                append_output_events,
                parse_console_input,
                execute_pending_commands,
                report_failed_commands,
                refresh_console_view,
            )
                .chain(),
        );

        // Persistence (feature-gated)
        #[cfg(feature = "persist")]
        {
            app.init_resource::<persist::PrefsPath>()
                .add_systems(Startup, persist::load_prefs_on_startup.after(register_builtin_commands));
        }

        // egui UI (feature-gated)
        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;
            use config::ConsoleConfig;
            use ui::ConsoleUiState;

            app.init_resource::<ConsoleUiState>()
                .init_resource::<ConsoleConfig>()
                .add_systems(Update, ui::open_close_ui)
                .add_systems(
                    EguiPrimaryContextPass,
                    ui::render_ui_system.run_if(|s: Res<ConsoleUiState>| s.open),
                );
        }

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Register built-in console commands.
fn register_builtin_commands(mut registry: ResMut<CommandRegistry>, mut handlers: ResMut<CommandHandlers>) {
    let keyword = registry.register_keyword(COMMAND_KEYWORD, |mode, registry| match mode {
        KeywordMode::Help => vec!["command".to_string()],
        KeywordMode::Autocomplete => registry
            .names_with_prefix("")
            .into_iter()
            .map(String::from)
            .collect(),
    });
    if let Err(e) = keyword {
        error!("Console: {}", e);
    }

    let builtins = [
        // help - Show help for a command or list all commands
        Command::new("help", |args, world| {
            let line = {
                let registry = world.resource::<CommandRegistry>();
                match args.get(0) {
                    None => help_list(registry),
                    Some(name) => match registry.get(&name.to_string()) {
                        Some(meta) => LogLine::info(help_entry(registry, meta)),
                        None => return false,
                    },
                }
            };
            world.resource_mut::<ConsoleLog>().append(line);
            true
        })
        .description("Lists every command, or describes one")
        .arg(ArgSlot::new([COMMAND_KEYWORD])),
        // clear - Clear console output
        Command::new("clear", |_args, world| {
            world.resource_mut::<ConsoleLog>().clear();
            true
        })
        .description("Clears the console"),
        // collapse - Merge repeated lines
        Command::new("collapse", |args, world| {
            let Some(collapse) = args.bool(0) else {
                return false;
            };

            let mut log = world.resource_mut::<ConsoleLog>();
            log.set_collapsing(collapse);
            log.append(LogLine::info(if collapse {
                "Console: Debug lines are now collapsed!"
            } else {
                "Console: Debug lines are now not collapsed!"
            }));
            true
        })
        .description("Collapses repeated debug lines into one")
        .arg(ArgSlot::new([true, false])),
    ];

    for cmd in builtins {
        if let Err(e) = register_command(&mut registry, &mut handlers, cmd) {
            error!("Console: {}", e);
        }
    }

    // Persistence commands (only with persist feature)
    #[cfg(feature = "persist")]
    persist::register_persist_commands(&mut registry, &mut handlers);
}

/// `{name} {slots}`, leaving out the slots when there are none.
fn signature(registry: &CommandRegistry, meta: &CommandMeta) -> String {
    let slots = registry.describe_signature(meta);
    if slots.is_empty() {
        meta.name().to_string()
    } else {
        format!("{} {}", meta.name(), slots)
    }
}

fn help_entry(registry: &CommandRegistry, meta: &CommandMeta) -> String {
    format!("{} - {}", signature(registry, meta), meta.description())
}

fn help_list(registry: &CommandRegistry) -> LogLine {
    let body = registry
        .sorted()
        .into_iter()
        .map(|meta| format!("-{}: {}", signature(registry, meta), meta.description()))
        .collect::<Vec<_>>()
        .join("\n");

    LogLine::new(HELP_LIST_HEADER, body, LogSeverity::Info)
}

/// Resource that holds parsed commands waiting for execution.
#[derive(Resource, Default)]
pub(crate) struct PendingCommands {
    pub(crate) queue: Vec<core::ParsedCommand>,
}

impl PendingCommands {
    /// Parse and queue a command line. Blank lines queue nothing and return
    /// false.
    pub(crate) fn queue_line(&mut self, line: &str) -> bool {
        let Ok(cmd) = parse_command_line(line) else {
            return false;
        };
        self.queue.push(cmd);
        true
    }
}

/// System that appends lines written as [`ConsoleOutputEvent`]s.
fn append_output_events(mut events: MessageReader<ConsoleOutputEvent>, mut log: ResMut<ConsoleLog>) {
    for event in events.read() {
        log.append(LogLine::new(event.header.clone(), event.body.clone(), event.severity));
    }
}

/// System that parses console input and queues commands for execution.
fn parse_console_input(
    mut input_events: MessageReader<ConsoleInputEvent>,
    mut pending: ResMut<PendingCommands>,
    mut input: ResMut<ConsoleInput>,
) {
    for event in input_events.read() {
        input.record_history(&event.command);
        pending.queue_line(&event.command);
    }
}

/// Exclusive system that executes queued commands with full World access.
fn execute_pending_commands(world: &mut World) {
    let queue = std::mem::take(&mut world.resource_mut::<PendingCommands>().queue);

    for cmd in queue {
        execute_command(world, &cmd.name, &cmd.args);
    }
}

/// System that turns failure notifications into console lines.
fn report_failed_commands(mut failures: MessageReader<CommandFailedEvent>, mut log: ResMut<ConsoleLog>) {
    for event in failures.read() {
        let line = match &event.error {
            ExecutionError::NotFound { .. } | ExecutionError::Rejected { .. } => {
                LogLine::error(format!("Invalid command: {}", event.command_line()))
            }
            ExecutionError::Busy { .. } | ExecutionError::MissingHandler { .. } => {
                LogLine::error(event.error.to_string())
            }
            ExecutionError::Panicked { message, .. } => LogLine::new(
                format!("Command '{}' panicked", event.name()),
                message.clone(),
                LogSeverity::Exception,
            ),
        };
        log.append(line);
    }
}

/// System that rebuilds the [`ConsoleView`] once the debounce fires.
fn refresh_console_view(
    time: Res<Time>,
    mut log: ResMut<ConsoleLog>,
    mut view: ResMut<ConsoleView>,
    mut refreshed: MessageWriter<ConsoleRefreshEvent>,
) {
    let log = &mut *log;
    let dirty = log.take_dirty();
    if log.debounce.poll(dirty, time.delta()) {
        view.rebuild(log.buffer());
        refreshed.write(ConsoleRefreshEvent);
    }
}

// Integration tests run without egui feature since MinimalPlugins doesn't provide
// the resources that egui UI systems require (ButtonInput, etc.)
// Run with: cargo test --no-default-features
#[cfg(all(test, not(feature = "egui")))]
mod tests {
    use super::*;

    /// Test resource to track command execution.
    #[derive(Resource, Default)]
    struct TestCommandExecuted {
        count: usize,
        last_args: Vec<ArgValue>,
        failures: Vec<String>,
        refreshes: usize,
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin {
            refresh_delay: Duration::ZERO,
            ..default()
        });
        app.init_resource::<TestCommandExecuted>();

        app.add_systems(Startup, |mut registry: ResMut<CommandRegistry>, mut handlers: ResMut<CommandHandlers>| {
            register_command(
                &mut registry,
                &mut handlers,
                Command::new("inc", |args, world| {
                    let mut tracker = world.resource_mut::<TestCommandExecuted>();
                    tracker.count += 1;
                    tracker.last_args = args.as_slice().to_vec();
                    true
                })
                .description("Test command"),
            )
            .unwrap();
        });

        app.add_systems(
            PostUpdate,
            |mut failures: MessageReader<CommandFailedEvent>,
             mut refreshes: MessageReader<ConsoleRefreshEvent>,
             mut tracker: ResMut<TestCommandExecuted>| {
                for event in failures.read() {
                    tracker.failures.push(event.name().to_string());
                }
                tracker.refreshes += refreshes.read().count();
            },
        );

        // Run startup
        app.update();
        app
    }

    fn submit(app: &mut App, line: &str) {
        app.world_mut().write_message(ConsoleInputEvent::new(line));
        app.update();
    }

    fn headers(app: &App) -> Vec<String> {
        app.world()
            .resource::<ConsoleLog>()
            .iter()
            .map(|line| line.header.clone())
            .collect()
    }

    #[test]
    fn test_command_execution() {
        let mut app = app();
        submit(&mut app, "inc arg1 2 true");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 1, "Command should have been executed once");
        assert_eq!(
            tracker.last_args,
            vec![ArgValue::from("arg1"), ArgValue::Int(2), ArgValue::Bool(true)]
        );
        assert!(tracker.failures.is_empty());
    }

    #[test]
    fn test_semicolon_is_part_of_argument() {
        let mut app = app();
        submit(&mut app, "inc a;b");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 1);
        assert_eq!(tracker.last_args, vec![ArgValue::from("a;b")]);
        assert!(tracker.failures.is_empty());
    }

    #[test]
    fn test_apostrophe_is_part_of_argument() {
        let mut app = app();
        submit(&mut app, "inc don't");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 1);
        assert_eq!(tracker.last_args, vec![ArgValue::from("don't")]);
    }

    #[test]
    fn test_unknown_command_reports_once() {
        let mut app = app();
        submit(&mut app, "test2 5");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.failures, vec!["test2"]);
        assert_eq!(headers(&app), vec!["Invalid command: test2 5"]);
        assert_eq!(app.world().resource::<ConsoleLog>().get(0).unwrap().severity, LogSeverity::Error);
    }

    #[test]
    fn test_builtin_help_lists_commands() {
        let mut app = app();
        submit(&mut app, "help");

        let log = app.world().resource::<ConsoleLog>();
        let line = log.get(0).unwrap();
        assert_eq!(line.header, HELP_LIST_HEADER);

        let entries: Vec<_> = line.body.lines().collect();
        let expected = [
            "-clear: Clears the console",
            "-collapse [true|false]: Collapses repeated debug lines into one",
            "-help [command]: Lists every command, or describes one",
            "-inc: Test command",
        ];
        for entry in expected {
            assert!(entries.contains(&entry), "missing help entry: {entry}");
        }

        // Sorted by name
        let mut sorted = entries.clone();
        sorted.sort();
        assert_eq!(entries, sorted);
    }

    #[test]
    fn test_builtin_help_single_command() {
        let mut app = app();
        submit(&mut app, "help collapse");
        assert_eq!(
            headers(&app),
            vec!["collapse [true|false] - Collapses repeated debug lines into one"]
        );

        submit(&mut app, "help 42");
        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.failures, vec!["help"]);
    }

    #[test]
    fn test_builtin_collapse() {
        let mut app = app();
        submit(&mut app, "collapse true");
        assert!(app.world().resource::<ConsoleLog>().is_collapsing());
        assert_eq!(headers(&app), vec!["Console: Debug lines are now collapsed!"]);

        submit(&mut app, "collapse maybe");
        assert!(app.world().resource::<ConsoleLog>().is_collapsing());
        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.failures, vec!["collapse"]);

        submit(&mut app, "collapse false");
        assert!(!app.world().resource::<ConsoleLog>().is_collapsing());
    }

    #[test]
    fn test_builtin_clear() {
        let mut app = app();
        app.world_mut().write_message(ConsoleOutputEvent::info("hello"));
        app.update();
        assert_eq!(headers(&app), vec!["hello"]);

        submit(&mut app, "clear");
        assert!(app.world().resource::<ConsoleLog>().is_empty());
    }

    #[test]
    fn test_output_events_collapse() {
        let mut app = app();
        submit(&mut app, "collapse true");
        for _ in 0..3 {
            app.world_mut().write_message(ConsoleOutputEvent::warning("again"));
        }
        app.update();

        let log = app.world().resource::<ConsoleLog>();
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).unwrap().header, "again");
        assert_eq!(log.get(0).unwrap().count, 2);
    }

    #[test]
    fn test_blank_line_queues_nothing() {
        let mut app = app();
        let before = app.world().resource::<ConsoleLog>().len();
        submit(&mut app, "   ");

        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 0);
        assert!(tracker.failures.is_empty());
        assert_eq!(app.world().resource::<ConsoleLog>().len(), before);
    }

    #[test]
    fn test_history_recorded() {
        let mut app = app();
        submit(&mut app, "inc");
        submit(&mut app, "help");

        let input = app.world().resource::<ConsoleInput>();
        assert_eq!(input.history(), ["help", "inc"]);
    }

    #[test]
    fn test_view_refresh() {
        let mut app = app();
        let before = app.world().resource::<TestCommandExecuted>().refreshes;

        app.world_mut().write_message(ConsoleOutputEvent::info("one"));
        app.world_mut().write_message(ConsoleOutputEvent::info("two"));
        app.update();

        let view = app.world().resource::<ConsoleView>();
        let rows: Vec<_> = view.rows.iter().map(|r| r.header.as_str()).collect();
        assert_eq!(rows, vec!["two", "one"]);
        assert_eq!(app.world().resource::<TestCommandExecuted>().refreshes, before + 1);

        // Nothing changed, nothing refreshed
        app.update();
        assert_eq!(app.world().resource::<TestCommandExecuted>().refreshes, before + 1);
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut app = app();
        app.world_mut()
            .run_system_cached(|mut console: Console| {
                assert!(console.register_cmd(Command::new("inc", |_, _| false)).is_err());
            })
            .unwrap();

        submit(&mut app, "inc");
        let tracker = app.world().resource::<TestCommandExecuted>();
        assert_eq!(tracker.count, 1);
        assert!(tracker.failures.is_empty());
    }
}
