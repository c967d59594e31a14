//! Command registry for managing available commands.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::command::Command;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A command with this name is already registered.
    #[error("Duplicate command name: '{0}'")]
    DuplicateName(String),

    /// The name can never be routed to as a positional argument.
    #[error("Invalid command name: '{0}'")]
    InvalidName(String),
}

/// Registry of available commands.
///
/// Names are unique and kept in registration order, which is also the order
/// used when rendering help.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    /// Map of command names to commands.
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            commands: IndexMap::new(),
        }
    }

    /// Build a registry from a sequence of command descriptors.
    ///
    /// Stops at the first descriptor that cannot be registered.
    pub fn from_commands(
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for cmd in commands {
            registry.register(cmd)?;
        }
        Ok(registry)
    }

    /// Register a command in the registry.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        validate_name(command.name())?;

        if self.commands.contains_key(command.name()) {
            return Err(RegistryError::DuplicateName(command.name().to_string()));
        }

        debug!(command = command.name(), "Registered command");
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// Look up a command by exact, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// All registered commands in registration order.
    pub fn list_all(&self) -> Vec<&Command> {
        self.commands.values().collect()
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Get all command names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Find commands whose name starts with `prefix`, ignoring case.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Command> {
        let prefix_lower = prefix.to_lowercase();

        self.commands
            .values()
            .filter(|cmd| cmd.name().to_lowercase().starts_with(&prefix_lower))
            .collect()
    }

    /// Create an iterator over all commands.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

impl<'a> IntoIterator for &'a CommandRegistry {
    type Item = &'a Command;
    type IntoIter = indexmap::map::Values<'a, String, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.values()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
