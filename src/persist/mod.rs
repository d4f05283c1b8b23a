//! Persistence layer for console preferences.
//!
//! Provides RON-based save/load for the collapse setting and command history,
//! plus the `exec` and `writeconfig` commands.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PendingCommands;
use crate::core::{
    Command, CommandHandlers, CommandRegistry, ConsoleInput, ConsoleLog, InputLine, LineBuffer, LogLine,
    register_command,
};

/// Default preferences file name.
pub const DEFAULT_PREFS_FILE: &str = "console.ron";

/// Serializable console preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConsolePrefs {
    /// Whether duplicate lines are collapsed.
    #[serde(default)]
    pub collapse_lines: bool,
    /// Submitted command lines, most recent first.
    #[serde(default)]
    pub history: Vec<String>,
}

impl ConsolePrefs {
    /// Create new default preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the preferences of a running console.
    pub fn capture(log: &LineBuffer, input: &InputLine) -> Self {
        Self {
            collapse_lines: log.is_collapsing(),
            history: input.history().to_vec(),
        }
    }

    /// Apply the preferences to a running console.
    pub fn apply(&self, log: &mut LineBuffer, input: &mut InputLine) {
        log.set_collapsing(self.collapse_lines);
        input.set_history(self.history.clone());
    }

    /// Load preferences from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| PrefsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        ron::from_str(&contents).map_err(|e| PrefsError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save preferences to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PrefsError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| PrefsError::Io {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let contents =
            ron::ser::to_string_pretty(self, pretty).map_err(|e| PrefsError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| PrefsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load preferences from file, returning defaults if that fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    /// Reading or writing the file failed.
    #[error("IO error for '{path}': {message}")]
    Io { path: String, message: String },
    /// The file is not valid RON for [`ConsolePrefs`].
    #[error("Parse error for '{path}': {message}")]
    Parse { path: String, message: String },
    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Resource storing the preferences file path.
#[derive(Resource, Debug, Clone)]
pub struct PrefsPath(pub String);

impl Default for PrefsPath {
    fn default() -> Self {
        Self(DEFAULT_PREFS_FILE.to_string())
    }
}

/// System to load preferences on startup.
pub fn load_prefs_on_startup(mut log: ResMut<ConsoleLog>, mut input: ResMut<ConsoleInput>, path: Res<PrefsPath>) {
    let path = &path.0;

    if !Path::new(path).exists() {
        info!("No console preferences at '{}', using defaults", path);
        return;
    }

    match ConsolePrefs::load(path) {
        Ok(prefs) => {
            prefs.apply(&mut log, &mut input);
            info!("Loaded console preferences from '{}' ({} history lines)", path, prefs.history.len());
        }
        Err(e) => {
            error!("Failed to load console preferences: {}", e);
        }
    }
}

/// Save the current preferences of `world`'s console.
pub fn save_prefs(world: &World, path: impl AsRef<Path>) -> Result<(), PrefsError> {
    let log = world.resource::<ConsoleLog>();
    let input = world.resource::<ConsoleInput>();
    ConsolePrefs::capture(log.buffer(), input).save(path)
}

/// Read a script and queue its commands. Returns the number queued.
///
/// Blank lines and lines starting with `//` or `#` are skipped.
pub(crate) fn queue_script(world: &mut World, contents: &str) -> usize {
    let mut pending = world.resource_mut::<PendingCommands>();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("//") && !line.starts_with('#'))
        .filter(|line| pending.queue_line(line))
        .count()
}

/// Register persistence-related commands.
pub(crate) fn register_persist_commands(registry: &mut CommandRegistry, handlers: &mut CommandHandlers) {
    let commands = [
        // exec - Execute commands from a file
        Command::new("exec", |args, world| {
            let Some(filename) = args.get(0).map(ToString::to_string) else {
                return false;
            };

            match fs::read_to_string(&filename) {
                Ok(contents) => {
                    let count = queue_script(world, &contents);
                    world
                        .resource_mut::<ConsoleLog>()
                        .append(LogLine::info(format!("Queued {} commands from '{}'", count, filename)));
                    true
                }
                Err(e) => {
                    world
                        .resource_mut::<ConsoleLog>()
                        .append(LogLine::error(format!("Failed to read '{}': {}", filename, e)));
                    true
                }
            }
        })
        .description("Executes the commands in a file: exec <file>"),
        // writeconfig - Save preferences to file
        Command::new("writeconfig", |args, world| {
            let filename = match args.get(0) {
                Some(arg) => arg.to_string(),
                None => world.resource::<PrefsPath>().0.clone(),
            };

            let result = save_prefs(world, &filename);
            let mut log = world.resource_mut::<ConsoleLog>();
            match result {
                Ok(()) => {
                    log.append(LogLine::info(format!("Saved preferences to '{}'", filename)));
                    true
                }
                Err(e) => {
                    log.append(LogLine::error(format!("Failed to save preferences: {}", e)));
                    true
                }
            }
        })
        .description("Saves console preferences"),
    ];

    for cmd in commands {
        if let Err(e) = register_command(registry, handlers, cmd) {
            error!("Console: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArgValue, CommandFailedEvent, execute_command};
    use bevy::ecs::message::Messages;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn persist_world() -> World {
        let mut world = World::new();
        world.init_resource::<ConsoleLog>();
        world.init_resource::<ConsoleInput>();
        world.init_resource::<PendingCommands>();
        world.init_resource::<PrefsPath>();
        world.init_resource::<Messages<CommandFailedEvent>>();

        let mut registry = CommandRegistry::new();
        let mut handlers = CommandHandlers::default();
        register_persist_commands(&mut registry, &mut handlers);
        world.insert_resource(registry);
        world.insert_resource(handlers);
        world
    }

    #[test]
    fn test_prefs_roundtrip() {
        let prefs = ConsolePrefs {
            collapse_lines: true,
            history: vec!["collapse true".to_string(), "help".to_string()],
        };

        let temp = NamedTempFile::new().unwrap();
        prefs.save(temp.path()).unwrap();

        let loaded = ConsolePrefs::load(temp.path()).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_prefs_load_missing() {
        let result = ConsolePrefs::load("nonexistent_file.ron");
        assert!(matches!(result, Err(PrefsError::Io { .. })));
    }

    #[test]
    fn test_prefs_load_or_default() {
        let prefs = ConsolePrefs::load_or_default("nonexistent_file.ron");
        assert_eq!(prefs, ConsolePrefs::default());
    }

    #[test]
    fn test_prefs_parse_ron() {
        let ron_content = r#"(
    collapse_lines: true,
    history: ["clear", "help collapse"],
)"#;

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(ron_content.as_bytes()).unwrap();
        temp.flush().unwrap();

        let prefs = ConsolePrefs::load(temp.path()).unwrap();
        assert!(prefs.collapse_lines);
        assert_eq!(prefs.history, vec!["clear", "help collapse"]);
    }

    #[test]
    fn test_prefs_missing_fields_default() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"(collapse_lines: true)").unwrap();
        temp.flush().unwrap();

        let prefs = ConsolePrefs::load(temp.path()).unwrap();
        assert!(prefs.collapse_lines);
        assert!(prefs.history.is_empty());
    }

    #[test]
    fn test_prefs_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"(collapse_lines: maybe)").unwrap();
        temp.flush().unwrap();

        assert!(matches!(ConsolePrefs::load(temp.path()), Err(PrefsError::Parse { .. })));
    }

    #[test]
    fn test_capture_and_apply() {
        let mut log = LineBuffer::new(8);
        let mut input = InputLine::new();
        log.set_collapsing(true);
        input.record_history("help");

        let prefs = ConsolePrefs::capture(&log, &input);
        assert!(prefs.collapse_lines);
        assert_eq!(prefs.history, vec!["help"]);

        let mut other_log = LineBuffer::new(8);
        let mut other_input = InputLine::new();
        prefs.apply(&mut other_log, &mut other_input);
        assert!(other_log.is_collapsing());
        assert_eq!(other_input.history(), ["help"]);
    }

    #[test]
    fn test_queue_script_skips_comments() {
        let mut world = World::new();
        world.init_resource::<PendingCommands>();

        let count = queue_script(&mut world, "// setup\n# also a comment\n\ncollapse true\nhelp\nclear\n");
        assert_eq!(count, 3);

        let names: Vec<_> = world
            .resource::<PendingCommands>()
            .queue
            .iter()
            .map(|cmd| cmd.name.clone())
            .collect();
        assert_eq!(names, vec!["collapse", "help", "clear"]);
    }

    #[test]
    fn test_exec_missing_file_reports_once() {
        let mut world = persist_world();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.cfg").display().to_string();

        assert!(execute_command(&mut world, "exec", &[ArgValue::from(missing)]));

        let log = world.resource::<ConsoleLog>();
        assert_eq!(log.len(), 1);
        assert!(log.get(0).unwrap().header.starts_with("Failed to read"));
        assert!(world.resource::<Messages<CommandFailedEvent>>().is_empty());
        assert!(world.resource::<PendingCommands>().queue.is_empty());
    }

    #[test]
    fn test_exec_queues_file() {
        let mut world = persist_world();
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"collapse true\n// comment\nhelp\n").unwrap();
        temp.flush().unwrap();

        let path = temp.path().display().to_string();
        assert!(execute_command(&mut world, "exec", &[ArgValue::from(path)]));
        assert_eq!(world.resource::<PendingCommands>().queue.len(), 2);
    }
}
