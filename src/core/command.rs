//! Console commands, their argument slots and the arguments handed to handlers.

use bevy::prelude::*;

use super::ArgValue;

/// Arguments passed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The command name as typed.
    name: &'a str,
    /// Coerced positional arguments (excluding the command name).
    args: &'a [ArgValue],
}

impl<'a> CommandArgs<'a> {
    /// Create new command args for `name`.
    pub fn new(name: &'a str, args: &'a [ArgValue]) -> Self {
        Self { name, args }
    }

    /// The command name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.args.get(index)
    }

    /// Get an argument as a boolean. `None` if absent or not a `Bool`.
    pub fn bool(&self, index: usize) -> Option<bool> {
        self.get(index).and_then(ArgValue::as_bool)
    }

    /// Get an argument as an integer. `None` if absent or not an `Int`.
    pub fn int(&self, index: usize) -> Option<i32> {
        self.get(index).and_then(ArgValue::as_int)
    }

    /// Get an argument as a string. `None` if absent or not a `Str`.
    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(ArgValue::as_str)
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[ArgValue] {
        self.args
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.args.iter()
    }

    /// Join the display form of all arguments.
    pub fn join(&self, separator: &str) -> String {
        self.args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Type alias for command handler functions.
///
/// Handlers receive the coerced arguments and mutable access to the Bevy
/// world, and return whether the command succeeded. Returning `false` is how
/// a handler rejects a malformed argument.
pub type CommandHandler = Box<dyn Fn(&CommandArgs, &mut World) -> bool + Send + Sync>;

/// One positional slot in a command's signature.
///
/// A slot lists the values it admits. String values naming a registered
/// keyword are expanded lazily when help or autocomplete needs them.
///
/// ```
/// use debug_console::core::ArgSlot;
///
/// let toggle = ArgSlot::new([true, false]);
/// let command = ArgSlot::new(["$command"]);
/// assert_eq!(toggle.values().len(), 2);
/// assert_eq!(command.values().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSlot {
    values: Vec<ArgValue>,
}

impl ArgSlot {
    /// Create a slot from its admissible values.
    pub fn new<V: Into<ArgValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared values, literals and keyword names alike.
    #[inline]
    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }
}

/// Metadata for a console command (stored in the registry).
///
/// The handler is stored separately in `CommandHandlers` so that handlers can
/// read the registry through `World` while they run.
#[derive(Debug)]
pub struct CommandMeta {
    /// The command name.
    pub name: Box<str>,
    /// Description.
    pub description: &'static str,
    /// Argument slots in positional order.
    pub slots: Vec<ArgSlot>,
}

impl CommandMeta {
    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Get the argument slots.
    #[inline]
    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    /// Get the slot at `index`, if the command declares that many.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<&ArgSlot> {
        self.slots.get(index)
    }
}

/// A console command with a handler function.
///
/// # Examples
///
/// ```ignore
/// let spawn = Command::new("spawn", |args, world| {
///     let Some(count) = args.int(0) else { return false };
///     for _ in 0..count {
///         world.spawn(Enemy);
///     }
///     true
/// })
/// .description("Spawn some enemies")
/// .arg(ArgSlot::new([1, 5, 10]));
/// ```
pub struct Command {
    name: Box<str>,
    description: &'static str,
    slots: Vec<ArgSlot>,
    handler: CommandHandler,
}

impl Command {
    /// Create a new command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandArgs, &mut World) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "",
            slots: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Append an argument slot.
    pub fn arg(mut self, slot: ArgSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &'static str {
        self.description
    }

    /// Get the argument slots.
    #[inline]
    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    /// Split the command into metadata and handler.
    pub fn split(self) -> (CommandMeta, CommandHandler) {
        (
            CommandMeta {
                name: self.name,
                description: self.description,
                slots: self.slots,
            },
            self.handler,
        )
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
