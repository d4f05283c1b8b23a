//! Command registry and keyword table.
//!
//! Central storage with trie-based name lookup for autocomplete.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use super::{ArgSlot, ArgValue, Command, CommandHandler, CommandMeta, NameIndex, RegistryError};

/// What a keyword is being expanded for.
///
/// The same keyword may answer differently: a short placeholder for help text,
/// the full list of values for autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordMode {
    /// Expanding inside `help` output.
    Help,
    /// Expanding into autocomplete candidates.
    Autocomplete,
}

/// Type alias for keyword resolver functions.
///
/// Resolvers see the registry at expansion time, so a keyword like "every
/// command name" reflects commands registered after the keyword itself.
pub type KeywordResolver = Box<dyn Fn(KeywordMode, &CommandRegistry) -> Vec<String> + Send + Sync>;

/// Stores command handlers separately from metadata.
///
/// This separation allows command handlers to access `World` (including
/// `CommandRegistry`) without borrow conflicts.
#[derive(Resource, Default)]
pub struct CommandHandlers {
    handlers: HashMap<Box<str>, CommandHandler>,
    // Names whose handler is taken out for execution
    running: HashSet<Box<str>>,
}

impl CommandHandlers {
    /// Create a new empty handler storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a command.
    pub fn register(&mut self, name: Box<str>, handler: CommandHandler) {
        self.handlers.insert(name, handler);
    }

    /// Check whether a handler is currently stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Take a handler temporarily for execution.
    ///
    /// Use `put` to return the handler after execution.
    pub fn take(&mut self, name: &str) -> Option<CommandHandler> {
        let handler = self.handlers.remove(name)?;
        self.running.insert(name.into());
        Some(handler)
    }

    /// Put a handler back after temporary removal.
    pub fn put(&mut self, name: &str, handler: CommandHandler) {
        self.running.remove(name);
        self.handlers.insert(name.into(), handler);
    }

    /// Check whether the handler for `name` is taken out by a running command.
    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains(name)
    }
}

/// Central registry of commands and keywords.
///
/// # Examples
///
/// ```ignore
/// let mut registry = CommandRegistry::new();
///
/// registry.register_keyword("$map", |mode, _| match mode {
///     KeywordMode::Help => vec!["map".into()],
///     KeywordMode::Autocomplete => vec!["de_dust".into(), "cs_office".into()],
/// })?;
///
/// let (name, handler) = registry.register(
///     Command::new("changelevel", |_, _| true).arg(ArgSlot::new(["$map"])),
/// )?;
/// ```
#[derive(Resource, Default)]
pub struct CommandRegistry {
    /// Ordered name index for prefix queries.
    index: NameIndex,
    /// Command metadata by name.
    commands: HashMap<Box<str>, CommandMeta>,
    /// Keyword resolvers by lowercased name.
    keywords: HashMap<Box<str>, KeywordResolver>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning its handler for storage in `CommandHandlers`.
    ///
    /// Fails with [`RegistryError::DuplicateCommand`] if the name is taken; the
    /// existing command is left untouched.
    pub fn register(&mut self, command: Command) -> Result<(Box<str>, CommandHandler), RegistryError> {
        if self.commands.contains_key(command.name()) {
            return Err(RegistryError::DuplicateCommand(command.name().into()));
        }

        let (meta, handler) = command.split();
        let name = meta.name.clone();
        self.index.insert(&name);
        self.commands.insert(name.clone(), meta);
        Ok((name, handler))
    }

    /// Register a keyword. Names are case-insensitive and stored lowercased.
    pub fn register_keyword<F>(&mut self, name: &str, resolver: F) -> Result<(), RegistryError>
    where
        F: Fn(KeywordMode, &CommandRegistry) -> Vec<String> + Send + Sync + 'static,
    {
        let key: Box<str> = name.to_lowercase().into();
        if self.keywords.contains_key(&key) {
            return Err(RegistryError::DuplicateKeyword(key));
        }

        self.keywords.insert(key, Box::new(resolver));
        Ok(())
    }

    /// Whether `token` names a registered keyword (case-insensitive).
    pub fn is_keyword(&self, token: &str) -> bool {
        self.keywords.contains_key(token.to_lowercase().as_str())
    }

    /// Whether a slot value refers to a keyword. Only strings can.
    pub fn is_keyword_value(&self, value: &ArgValue) -> bool {
        value.as_str().is_some_and(|s| self.is_keyword(s))
    }

    /// Expand a keyword.
    ///
    /// Callers check [`is_keyword`](Self::is_keyword) first; a non-keyword
    /// token yields [`RegistryError::NotAKeyword`].
    pub fn resolve(&self, token: &str, mode: KeywordMode) -> Result<Vec<String>, RegistryError> {
        let resolver = self
            .keywords
            .get(token.to_lowercase().as_str())
            .ok_or_else(|| RegistryError::NotAKeyword(token.to_string()))?;
        Ok(resolver(mode, self))
    }

    /// Get a command's metadata by name.
    pub fn get(&self, name: &str) -> Option<&CommandMeta> {
        self.commands.get(name)
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over all commands.
    ///
    /// The order is unspecified but does not change during a single iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandMeta)> {
        self.commands.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// All commands sorted by name.
    pub fn sorted(&self) -> Vec<&CommandMeta> {
        self.index
            .names()
            .into_iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    /// Names starting with `prefix` (case-sensitive), sorted.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.index.with_prefix(prefix)
    }

    /// Autocomplete candidates for a command's argument slot.
    ///
    /// Keywords are expanded in [`KeywordMode::Autocomplete`]; every candidate,
    /// literal or resolved, is lowercased. Returns `None` when the command does
    /// not exist or has no slot at `slot_index`.
    pub fn slot_candidates(&self, name: &str, slot_index: usize) -> Option<Vec<String>> {
        let slot = self.get(name)?.slot(slot_index)?;

        let mut candidates = Vec::new();
        for value in slot.values() {
            match value.as_str() {
                Some(token) if self.is_keyword(token) => {
                    match self.resolve(token, KeywordMode::Autocomplete) {
                        Ok(values) => candidates.extend(values.iter().map(|v| v.to_lowercase())),
                        Err(e) => debug!("Console: {}", e),
                    }
                }
                _ => candidates.push(value.to_string().to_lowercase()),
            }
        }
        Some(candidates)
    }

    /// Format a slot for help output, e.g. `[true|false]`.
    pub fn describe_slot(&self, slot: &ArgSlot) -> String {
        let values: Vec<String> = slot
            .values()
            .iter()
            .map(|value| match value.as_str() {
                Some(token) if self.is_keyword(token) => self
                    .resolve(token, KeywordMode::Help)
                    .map(|v| v.join("|"))
                    .unwrap_or_else(|_| token.to_string()),
                _ => value.to_string().to_lowercase(),
            })
            .collect();

        format!("[{}]", values.join("|"))
    }

    /// Format all slots of a command, space separated.
    pub fn describe_signature(&self, meta: &CommandMeta) -> String {
        meta.slots()
            .iter()
            .map(|slot| self.describe_slot(slot))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Register a command in both registry and handlers.
pub fn register_command(
    registry: &mut CommandRegistry,
    handlers: &mut CommandHandlers,
    command: Command,
) -> Result<(), RegistryError> {
    let (name, handler) = registry.register(command)?;
    handlers.register(name, handler);
    Ok(())
}
