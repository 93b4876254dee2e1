//! Console registry for ConVars and ConCommands.
//!
//! Central name → command map. Aliases are extra keys pointing at the same
//! `Arc<ConCommand>`, so they share identity and value with their target
//! name. Iteration follows registration order; a trie on the side answers
//! prefix queries in sorted order.

use std::sync::Arc;

use bevy::prelude::*;
use indexmap::IndexMap;
use parking_lot::Mutex;

use super::{
    CommandArgs, CommandContext, ConCommand, ConVar, ConVarValue, ConsoleError, ConsoleSink,
    PrintLevel, Trie, builtin, contains_match, match_and_sort, subsequence_match, tokenize,
};

/// Hint printed after an unknown command.
pub const HELP_HINT: &str = "Type 'help' for a list of available commands";

/// Central registry for console variables and commands.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::{ConsoleRegistry, ConsoleBuffer, assign_variable};
///
/// let mut registry = ConsoleRegistry::with_builtins();
/// registry
///     .register_float_var("sv_gravity", 800.0, "World gravity", assign_variable, &[], true)
///     .unwrap();
///
/// let mut console = ConsoleBuffer::default();
/// registry.execute("sv_gravity 600", &mut console).unwrap();
///
/// assert_eq!(registry.get_value_float("sv_gravity"), 600.0);
/// assert_eq!(console.last().unwrap().text, "ConVar [sv_gravity] changed: 800 => 600");
/// ```
#[derive(Resource, Default)]
pub struct ConsoleRegistry {
    entries: IndexMap<Box<str>, Arc<ConCommand>>,
    names: Trie<()>,
    /// Lines waiting to be shown on every console.
    global: Mutex<Vec<(PrintLevel, String)>>,
}

impl ConsoleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in commands.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        if let Err(err) = builtin::register_builtins(&mut registry) {
            warn!("Console: failed to register built-in commands: {}", err);
        }
        registry
    }

    /// Register a command under its own name.
    ///
    /// A taken name is rejected: the error is broadcast to every console and
    /// the existing entry stays untouched.
    pub fn register(&mut self, command: ConCommand) -> Result<Arc<ConCommand>, ConsoleError> {
        if self.entries.contains_key(command.name()) {
            let err = ConsoleError::DuplicateName {
                name: command.name().to_string(),
            };
            warn!("Console: {}", err);
            self.print_global(PrintLevel::Error, err.to_string());
            return Err(err);
        }

        let command = Arc::new(command);
        self.names.insert(command.name(), ());
        self.entries.insert(command.name().into(), Arc::clone(&command));
        debug!("Console: registered '{}'", command.name());
        Ok(command)
    }

    /// Register a typed variable and get its handle back.
    pub fn register_var<T, F>(
        &mut self,
        name: &str,
        default: T,
        description: &str,
        callback: F,
        arguments: &[&str],
        is_variable: bool,
    ) -> Result<ConVar<T>, ConsoleError>
    where
        T: ConVarValue,
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        let command = ConCommand::new(name, default)
            .description(description)
            .arguments(arguments.iter().copied())
            .variable(is_variable)
            .callback(callback);

        let command = self.register(command)?;
        let kind = command.kind();
        ConVar::from_command(command).ok_or_else(|| ConsoleError::TypeMismatch {
            name: name.to_string(),
            expected: T::KIND,
            found: kind,
        })
    }

    pub fn register_float_var<F>(
        &mut self,
        name: &str,
        default: f32,
        description: &str,
        callback: F,
        arguments: &[&str],
        is_variable: bool,
    ) -> Result<ConVar<f32>, ConsoleError>
    where
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_var(name, default, description, callback, arguments, is_variable)
    }

    pub fn register_int_var<F>(
        &mut self,
        name: &str,
        default: i32,
        description: &str,
        callback: F,
        arguments: &[&str],
        is_variable: bool,
    ) -> Result<ConVar<i32>, ConsoleError>
    where
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_var(name, default, description, callback, arguments, is_variable)
    }

    pub fn register_bool_var<F>(
        &mut self,
        name: &str,
        default: bool,
        description: &str,
        callback: F,
        arguments: &[&str],
        is_variable: bool,
    ) -> Result<ConVar<bool>, ConsoleError>
    where
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_var(name, default, description, callback, arguments, is_variable)
    }

    pub fn register_string_var<F>(
        &mut self,
        name: &str,
        default: impl Into<String>,
        description: &str,
        callback: F,
        arguments: &[&str],
        is_variable: bool,
    ) -> Result<ConVar<String>, ConsoleError>
    where
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_var(name, default.into(), description, callback, arguments, is_variable)
    }

    /// Make `target` reachable under a second name.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<(), ConsoleError> {
        let result = if self.entries.contains_key(alias) {
            Err(ConsoleError::AliasCollision {
                alias: alias.to_string(),
                target: target.to_string(),
            })
        } else if let Some(command) = self.entries.get(target).cloned() {
            self.names.insert(alias, ());
            self.entries.insert(alias.into(), command);
            Ok(())
        } else {
            Err(ConsoleError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            })
        };

        if let Err(err) = &result {
            warn!("Console: {}", err);
            self.print_global(PrintLevel::Error, err.to_string());
        }
        result
    }

    /// Remove one name. Other aliases of the same command keep working.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<ConCommand>> {
        let command = self.entries.shift_remove(name)?;
        self.names.remove(name);
        Some(command)
    }

    /// Get a command by exact name.
    pub fn get_command(&self, name: &str) -> Option<&Arc<ConCommand>> {
        self.entries.get(name)
    }

    /// Get a typed handle, `None` when absent or holding another kind.
    pub fn get_variable<T: ConVarValue>(&self, name: &str) -> Option<ConVar<T>> {
        self.entries
            .get(name)
            .and_then(|command| ConVar::from_command(Arc::clone(command)))
    }

    pub fn get_value_bool(&self, name: &str) -> bool {
        self.get_value(name)
    }

    pub fn get_value_int(&self, name: &str) -> i32 {
        self.get_value(name)
    }

    pub fn get_value_float(&self, name: &str) -> f32 {
        self.get_value(name)
    }

    pub fn get_value_string(&self, name: &str) -> String {
        self.get_value(name)
    }

    /// Typed value by name, the zero value when absent or of another kind.
    pub fn get_value<T: ConVarValue>(&self, name: &str) -> T {
        self.get_variable::<T>(name)
            .map(|var| var.get_value())
            .unwrap_or_default()
    }

    /// Assign a typed value by name.
    pub fn set_value<T: ConVarValue>(
        &self,
        name: &str,
        value: T,
        console: Option<&mut dyn ConsoleSink>,
    ) -> Result<bool, ConsoleError> {
        let command = self
            .entries
            .get(name)
            .ok_or_else(|| ConsoleError::UnknownCommand {
                name: name.to_string(),
            })?;
        command.set_value(value.into_value(), console)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the number of names (aliases included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every name in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ConCommand>)> {
        self.entries.iter().map(|(name, command)| (name.as_ref(), command))
    }

    /// Registered names starting with `prefix`, sorted.
    pub fn names_with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.names.prefix_iter(prefix).map(|(name, _)| name)
    }

    /// Find entries by name or description.
    ///
    /// Substring matches come first; when there are none, names are matched
    /// as a fuzzy subsequence instead.
    pub fn search(&self, query: &str) -> Vec<(&str, &Arc<ConCommand>)> {
        let query_lower = query.to_lowercase();

        let mut matches: Vec<_> = self
            .iter()
            .filter(|(name, command)| {
                name.to_lowercase().contains(&query_lower)
                    || command.get_description().to_lowercase().contains(&query_lower)
            })
            .collect();
        matches.sort_by(|a, b| a.0.cmp(b.0));

        if matches.is_empty() {
            matches = match_and_sort(query, self.entries.keys().map(AsRef::as_ref), subsequence_match)
                .into_iter()
                .filter_map(|(name, _)| self.entries.get(name).map(|command| (name, command)))
                .collect();
        }

        matches
    }

    /// Names matching `query` by containment, best first.
    pub(crate) fn matching_names(&self, query: &str) -> Vec<(&str, super::MatchResult)> {
        match_and_sort(query, self.entries.keys().map(AsRef::as_ref), contains_match)
    }

    /// Tokenize, resolve and run one command line on behalf of `console`.
    ///
    /// Errors are printed to `console` and returned. Blank lines do nothing.
    pub fn execute(&self, line: &str, console: &mut dyn ConsoleSink) -> Result<bool, ConsoleError> {
        let tokenized = tokenize(line)?;

        let Some(command) = self.entries.get(tokenized.command).cloned() else {
            let err = ConsoleError::UnknownCommand {
                name: tokenized.command.to_string(),
            };
            console.error(&err.to_string());
            console.info(HELP_HINT);
            return Err(err);
        };

        if tokenized.tokens.len() < command.argument_count() + 1 {
            let err = ConsoleError::arity(tokenized.command, command.get_arguments());
            console.error(&err.to_string());
            return Err(err);
        }

        let args = CommandArgs::new(line, tokenized.tokens);
        let mut ctx = CommandContext {
            registry: self,
            console,
        };
        Ok(command.invoke(&args, &mut ctx))
    }

    /// Queue a line for every console.
    pub fn print_global(&self, level: PrintLevel, message: impl Into<String>) {
        self.global.lock().push((level, message.into()));
    }

    /// Drain the queued global lines.
    pub fn take_global(&self) -> Vec<(PrintLevel, String)> {
        std::mem::take(&mut *self.global.lock())
    }

    /// Print the queued global lines into each sink.
    pub fn flush_global<'a>(&self, sinks: impl IntoIterator<Item = &'a mut dyn ConsoleSink>) {
        let lines = self.take_global();
        if lines.is_empty() {
            return;
        }

        for sink in sinks {
            for (level, message) in &lines {
                sink.print(*level, message);
            }
        }
    }
}
