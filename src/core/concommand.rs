//! Console command (ConCommand) implementation.
//!
//! A ConCommand is a named entry that runs a callback when invoked. Every
//! command carries a typed value; a command flagged as a variable reports
//! changes to that value and completes as `name `.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::convar::VarState;
use super::{ConVarValue, ConsoleError, ConsoleRegistry, ConsoleSink, VarKind, VarValue};

/// Arguments passed to a command callback.
///
/// Holds the full token list, the command name included at index 0.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    raw: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    pub fn new(raw: &'a str, tokens: Vec<&'a str>) -> Self {
        Self { raw, tokens }
    }

    /// Get the raw command line.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The name the command was invoked under (may be an alias).
    #[inline]
    pub fn name(&self) -> &str {
        self.tokens.first().copied().unwrap_or_default()
    }

    /// Every token, the command name included.
    #[inline]
    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Number of tokens after the command name.
    #[inline]
    pub fn param_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// Get a parameter by index, `0` being the first token after the name.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index + 1).copied()
    }

    /// The tokens after the command name.
    #[inline]
    pub fn params(&self) -> &[&'a str] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// Join the parameters back into one string.
    pub fn join_params(&self, separator: &str) -> String {
        self.params().join(separator)
    }
}

/// What a callback gets to work with besides its own command.
pub struct CommandContext<'a> {
    /// The registry the command was dispatched from.
    pub registry: &'a ConsoleRegistry,
    /// The console that submitted the line.
    pub console: &'a mut dyn ConsoleSink,
}

/// Type alias for command callbacks.
///
/// The return value is advisory; dispatch does not act on it.
pub type ConVarCallback =
    Box<dyn Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync>;

/// A console command with a callback and a typed value.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::{ConCommand, ConsoleSink, VarKind};
///
/// let cmd = ConCommand::new("bind", false)
///     .description("Bind a key")
///     .arguments(["key", "command"])
///     .callback(|_cmd, args, ctx| {
///         ctx.console.info(&format!("bound {}", args.join_params(" ")));
///         true
///     });
///
/// assert_eq!(cmd.argument_count(), 2);
/// assert_eq!(cmd.kind(), VarKind::Bool);
/// ```
pub struct ConCommand {
    name: Box<str>,
    description: String,
    arguments: Vec<String>,
    is_variable: bool,
    kind: VarKind,
    callback: ConVarCallback,
    state: RwLock<VarState>,
}

impl ConCommand {
    /// Create a new command holding `default`.
    ///
    /// The callback defaults to [`assign_variable`](super::builtin::assign_variable).
    pub fn new<T: ConVarValue>(name: impl Into<Box<str>>, default: T) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            arguments: Vec::new(),
            is_variable: false,
            kind: T::KIND,
            callback: Box::new(super::builtin::assign_variable),
            state: RwLock::new(VarState::new(default.into_value())),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set the declared argument names.
    pub fn arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the command as a variable.
    pub fn variable(mut self, is_variable: bool) -> Self {
        self.is_variable = is_variable;
        self
    }

    /// Set the callback.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ConCommand, &CommandArgs<'_>, &mut CommandContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.callback = Box::new(callback);
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        self.is_variable
    }

    #[inline]
    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    #[inline]
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    #[inline]
    pub fn get_arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The kind of value this command holds.
    #[inline]
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Run the callback.
    pub fn invoke(&self, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
        (self.callback)(self, args, ctx)
    }

    /// Snapshot of the current value.
    pub fn value(&self) -> VarValue {
        self.state.read().value.clone()
    }

    /// The value the command was created with.
    pub fn default_value(&self) -> VarValue {
        self.state.read().default.clone()
    }

    /// Check if the value differs from the default.
    pub fn is_modified(&self) -> bool {
        let state = self.state.read();
        state.value != state.default
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, VarState> {
        self.state.read()
    }

    pub(crate) fn state_mut(&self) -> RwLockWriteGuard<'_, VarState> {
        self.state.write()
    }

    /// Assign a new value.
    ///
    /// Returns `Ok(false)` when the value is unchanged. With a console, the
    /// bounds are checked and variables print a change notice; without one
    /// the value is assigned silently and unchecked.
    pub fn set_value(
        &self,
        value: VarValue,
        console: Option<&mut dyn ConsoleSink>,
    ) -> Result<bool, ConsoleError> {
        if value.kind() != self.kind {
            let err = ConsoleError::TypeMismatch {
                name: self.name.to_string(),
                expected: self.kind,
                found: value.kind(),
            };
            if let Some(console) = console {
                console.error(&err.to_string());
            }
            return Err(err);
        }

        let mut state = self.state.write();
        if state.value == value {
            return Ok(false);
        }

        let Some(console) = console else {
            state.value = value;
            return Ok(true);
        };

        if let Some(bounds) = state.out_of_range(&value) {
            drop(state);
            let err = ConsoleError::OutOfRange {
                name: self.name.to_string(),
                bounds,
            };
            console.error(&err.to_string());
            return Err(err);
        }

        let old = std::mem::replace(&mut state.value, value);
        let notice = format!("ConVar [{}] changed: {} => {}", self.name, old, state.value);
        drop(state);

        if self.is_variable {
            console.notice(&notice);
        }

        Ok(true)
    }

    /// Go back to the default value.
    pub fn reset(&self, console: Option<&mut dyn ConsoleSink>) -> Result<bool, ConsoleError> {
        let default = self.default_value();
        self.set_value(default, console)
    }

    /// Parse `text` as this command's kind and assign it.
    pub fn set_from_str(
        &self,
        text: &str,
        console: Option<&mut dyn ConsoleSink>,
    ) -> Result<bool, ConsoleError> {
        match VarValue::parse(self.kind, text) {
            Some(value) => self.set_value(value, console),
            None => {
                let err = ConsoleError::InvalidValue {
                    name: self.name.to_string(),
                    value: text.to_string(),
                    kind: self.kind,
                };
                if let Some(console) = console {
                    console.error(&err.to_string());
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("is_variable", &self.is_variable)
            .field("value", &self.state.read().value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConsoleBuffer, PrintLevel};

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new("say hello world", vec!["say", "hello", "world"]);
        assert_eq!(args.name(), "say");
        assert_eq!(args.param_count(), 2);
        assert_eq!(args.param(0), Some("hello"));
        assert_eq!(args.param(1), Some("world"));
        assert_eq!(args.param(2), None);
        assert_eq!(args.as_slice().len(), 3);
    }

    #[test]
    fn test_command_args_join() {
        let args = CommandArgs::new("say hello world", vec!["say", "hello", "world"]);
        assert_eq!(args.join_params(" "), "hello world");

        let empty = CommandArgs::new("say", vec!["say"]);
        assert_eq!(empty.join_params(" "), "");
        assert!(empty.params().is_empty());
    }

    #[test]
    fn test_concommand_creation() {
        let cmd = ConCommand::new("bind", 0i32)
            .description("Bind a key")
            .arguments(["key", "command"]);

        assert_eq!(cmd.name(), "bind");
        assert_eq!(cmd.get_description(), "Bind a key");
        assert!(cmd.has_arguments());
        assert_eq!(cmd.argument_count(), 2);
        assert!(!cmd.is_variable());
        assert_eq!(cmd.kind(), VarKind::Int);
    }

    #[test]
    fn test_invoke_runs_callback() {
        let registry = ConsoleRegistry::new();
        let cmd = ConCommand::new("echo", false).callback(|cmd, args, ctx| {
            ctx.console.info(&format!("{}: {}", cmd.name(), args.join_params(" ")));
            true
        });

        let mut console = ConsoleBuffer::default();
        let args = CommandArgs::new("echo a b", vec!["echo", "a", "b"]);
        let mut ctx = CommandContext {
            registry: &registry,
            console: &mut console,
        };

        assert!(cmd.invoke(&args, &mut ctx));
        assert_eq!(console.last().unwrap().text, "echo: a b");
    }

    #[test]
    fn test_type_mismatch() {
        let cmd = ConCommand::new("name", String::from("player"));
        let mut console = ConsoleBuffer::default();

        let result = cmd.set_value(VarValue::Int(3), Some(&mut console));

        assert!(matches!(result, Err(ConsoleError::TypeMismatch { .. })));
        assert_eq!(console.last().unwrap().level, PrintLevel::Error);
        assert_eq!(cmd.value(), VarValue::Text("player".into()));
    }

    #[test]
    fn test_set_from_str() {
        let cmd = ConCommand::new("sv_cheats", false).variable(true);
        let mut console = ConsoleBuffer::default();

        assert_eq!(cmd.set_from_str("on", Some(&mut console)), Ok(true));
        assert_eq!(cmd.value(), VarValue::Bool(true));
        assert_eq!(console.last().unwrap().text, "ConVar [sv_cheats] changed: false => true");

        let result = cmd.set_from_str("sure", Some(&mut console));
        assert!(matches!(result, Err(ConsoleError::InvalidValue { .. })));
        assert_eq!(console.last().unwrap().text, "Invalid value 'sure' for sv_cheats, expected bool");
    }

    #[test]
    fn test_non_variable_has_no_notice() {
        let cmd = ConCommand::new("quiet", 1i32);
        let mut console = ConsoleBuffer::default();

        assert_eq!(cmd.set_value(VarValue::Int(2), Some(&mut console)), Ok(true));
        assert!(console.is_empty());
        assert!(cmd.is_modified());

        cmd.reset(None).unwrap();
        assert!(!cmd.is_modified());
    }
}
