//! Unified console API for convenient access.
//!
//! The [`Console`] system parameter combines [`CommandRegistry`],
//! [`CommandHandlers`] and the [`ConsoleLog`] into a single ergonomic API.
//! The per-console resources live here as well.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    Command, CommandHandlers, CommandMeta, CommandRegistry, InputLine, KeywordMode, LineBuffer, LogLine,
    RefreshDebounce, RegistryError, register_command,
};

/// The console log: a [`LineBuffer`] plus the debounce driving view refreshes.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct ConsoleLog {
    #[deref]
    buffer: LineBuffer,
    pub(crate) debounce: RefreshDebounce,
}

impl ConsoleLog {
    /// Create a log with the given capacity and debounce.
    pub fn new(buffer: LineBuffer, debounce: RefreshDebounce) -> Self {
        Self { buffer, debounce }
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }
}

/// Snapshot of the log taken at the last refresh.
///
/// Hosts render from this instead of the live buffer, so a burst of lines
/// costs one redraw.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsoleView {
    /// Lines, newest first.
    pub rows: Vec<LogLine>,
    /// Whether the buffer was collapsing when the snapshot was taken.
    pub collapsing: bool,
    /// [`LineBuffer::appended`] at snapshot time.
    pub appended: u64,
    /// Incremented on every refresh.
    pub generation: u64,
}

impl ConsoleView {
    /// Rebuild the snapshot from `buffer`.
    pub fn rebuild(&mut self, buffer: &LineBuffer) {
        self.rows.clear();
        self.rows.extend(buffer.iter().cloned());
        self.collapsing = buffer.is_collapsing();
        self.appended = buffer.appended();
        self.generation += 1;
    }

    /// Rows rendered as plain text, newest first.
    pub fn render(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| row.render(self.collapsing))
    }
}

/// The console's input line editor.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct ConsoleInput(pub InputLine);

/// Unified console system parameter for convenient access.
///
/// # Examples
///
/// ```ignore
/// fn setup_console(mut console: Console) {
///     console.register_cmd(Command::new("noclip", |_, world| {
///         world.resource_mut::<Player>().noclip ^= true;
///         true
///     }).description("Toggle noclip mode"));
///
///     console.info("Noclip available");
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, CommandRegistry>,
    handlers: ResMut<'w, CommandHandlers>,
    log: ResMut<'w, ConsoleLog>,
}

impl Console<'_> {
    /// Register a console command.
    ///
    /// Registers both the metadata (in the registry) and the handler. A name
    /// collision is logged and returned; the existing command stays.
    pub fn register_cmd(&mut self, cmd: Command) -> Result<(), RegistryError> {
        register_command(&mut self.registry, &mut self.handlers, cmd).inspect_err(|e| error!("Console: {}", e))
    }

    /// Register a keyword usable in argument slots.
    pub fn register_keyword<F>(&mut self, name: &str, resolver: F) -> Result<(), RegistryError>
    where
        F: Fn(KeywordMode, &CommandRegistry) -> Vec<String> + Send + Sync + 'static,
    {
        self.registry
            .register_keyword(name, resolver)
            .inspect_err(|e| error!("Console: {}", e))
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Get a command's metadata.
    pub fn get(&self, name: &str) -> Option<&CommandMeta> {
        self.registry.get(name)
    }

    /// Append a line to the log.
    pub fn push(&mut self, line: LogLine) {
        self.log.append(line);
    }

    /// Append an info line.
    pub fn info(&mut self, header: impl Into<String>) {
        self.push(LogLine::info(header));
    }

    /// Append a warning line.
    pub fn warning(&mut self, header: impl Into<String>) {
        self.push(LogLine::warning(header));
    }

    /// Append an error line.
    pub fn error(&mut self, header: impl Into<String>) {
        self.push(LogLine::error(header));
    }

    /// Remove every line from the log.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Enable or disable collapsing of duplicate lines.
    pub fn set_collapsing(&mut self, collapsing: bool) {
        self.log.set_collapsing(collapsing);
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Get read-only access to the log.
    pub fn log(&self) -> &LineBuffer {
        self.log.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogSeverity;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_view_rebuild() {
        let mut buffer = LineBuffer::new(4);
        buffer.set_collapsing(true);
        buffer.append(LogLine::info("a"));
        buffer.append(LogLine::info("a"));
        buffer.append(LogLine::warning("b"));

        let mut view = ConsoleView::default();
        view.rebuild(&buffer);

        assert_eq!(view.generation, 1);
        assert_eq!(view.appended, 2);
        assert!(view.collapsing);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].severity, LogSeverity::Warning);
        assert!(view.render().nth(1).unwrap().ends_with("a [x1]"));
    }

    #[test]
    fn test_console_param() {
        let mut world = World::new();
        world.init_resource::<CommandRegistry>();
        world.init_resource::<CommandHandlers>();
        world.init_resource::<ConsoleLog>();

        world
            .run_system_once(|mut console: Console| {
                assert!(console.register_cmd(Command::new("ping", |_, _| true)).is_ok());
                assert!(console.register_cmd(Command::new("ping", |_, _| true)).is_err());
                assert!(console.contains("ping"));

                console.info("hello");
                console.error("world");
                assert_eq!(console.log().len(), 2);

                console.clear();
                assert!(console.log().is_empty());
            })
            .unwrap();

        assert!(world.resource::<CommandHandlers>().contains("ping"));
    }
}
