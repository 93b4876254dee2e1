//! Per-console front-end state and the system parameter driving it.
//!
//! A [`DevConsole`] is what a widget renders: the line buffer, the command
//! line and its history. It is the [`ConsoleSink`] a submitted line reports
//! back to. [`Console`] bundles the registry with every console for systems
//! that want to run commands or print.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    CommandHistory, CompletionSuggestion, ConsoleBuffer, ConsoleError, ConsoleLine,
    ConsoleRegistry, ConsoleSink, PrintLevel,
};

/// One console front-end.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::{ConsoleRegistry, DevConsole};
///
/// let registry = ConsoleRegistry::with_builtins();
/// let mut console = DevConsole::default();
///
/// console.set_input("say hello");
/// console.submit(&registry);
///
/// assert_eq!(console.input(), "");
/// assert_eq!(console.lines().last().unwrap().text, "hello");
///
/// console.history_previous();
/// assert_eq!(console.input(), "say hello");
/// ```
#[derive(Component, Debug, Clone, Default)]
pub struct DevConsole {
    buffer: ConsoleBuffer,
    history: CommandHistory,
    input: String,
    /// Index into the history while browsing it, `None` on a fresh line.
    history_cursor: Option<usize>,
}

impl DevConsole {
    /// Create a console keeping `history` submitted lines and `lines` output lines.
    pub fn with_capacity(history: usize, lines: usize) -> Self {
        Self {
            buffer: ConsoleBuffer::new(lines),
            history: CommandHistory::new(history),
            ..Default::default()
        }
    }

    /// The command line being edited.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the command line, leaving history browsing.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.history_cursor = None;
    }

    /// Output lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.buffer.lines()
    }

    #[inline]
    pub fn buffer(&self) -> &ConsoleBuffer {
        &self.buffer
    }

    #[inline]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Submit the current command line.
    pub fn submit(&mut self, registry: &ConsoleRegistry) -> Option<Result<bool, ConsoleError>> {
        let line = std::mem::take(&mut self.input);
        let result = self.submit_line(&line, registry);
        if result.is_none() {
            self.input = line;
        }
        result
    }

    /// Record `line` in the history and run it.
    ///
    /// Returns `None` for a blank line, which is neither recorded nor run.
    /// Otherwise the history cursor and the command line are reset whatever
    /// the outcome.
    pub fn submit_line(
        &mut self,
        line: &str,
        registry: &ConsoleRegistry,
    ) -> Option<Result<bool, ConsoleError>> {
        if line.trim().is_empty() {
            return None;
        }

        self.history.record(line);
        let result = registry.execute(line, &mut self.buffer);

        self.history_cursor = None;
        self.input.clear();
        Some(result)
    }

    /// Step back to an older history entry (the Up key).
    pub fn history_previous(&mut self) {
        let next = self.history_cursor.map_or(0, |cursor| cursor + 1);
        if let Some(entry) = self.history.get(next) {
            self.input = entry.to_string();
            self.history_cursor = Some(next);
        }
    }

    /// Step forward to a newer entry, or an empty line past the newest (the Down key).
    pub fn history_next(&mut self) {
        match self.history_cursor {
            Some(cursor) if cursor > 0 => {
                self.history_cursor = Some(cursor - 1);
                self.input = self.history.get(cursor - 1).unwrap_or_default().to_string();
            }
            _ => {
                self.input.clear();
                self.history_cursor = None;
            }
        }
    }

    /// Completion candidates for the current command line.
    pub fn suggestions(&self, registry: &ConsoleRegistry) -> Vec<CompletionSuggestion> {
        registry.suggestions(&self.input)
    }

    /// Replace the command line with an accepted suggestion.
    pub fn accept_completion(&mut self, suggestion: &CompletionSuggestion) {
        self.set_input(suggestion.completion.clone());
    }
}

impl ConsoleSink for DevConsole {
    fn print(&mut self, level: PrintLevel, message: &str) {
        self.buffer.push(level, message);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Registry plus every console, for systems.
///
/// # Examples
///
/// ```ignore
/// fn cheat_detector(mut console: Console) {
///     if console.registry().get_value_bool("sv_cheats") {
///         console.print_all(PrintLevel::Warning, "Cheats are enabled");
///     }
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w, 's> {
    registry: Res<'w, ConsoleRegistry>,
    consoles: Query<'w, 's, &'static mut DevConsole>,
}

impl Console<'_, '_> {
    /// Read-only access to the registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }

    /// Run `line` on behalf of the `console` entity.
    ///
    /// Returns `None` for a blank line or an entity without a [`DevConsole`].
    pub fn submit(&mut self, console: Entity, line: &str) -> Option<Result<bool, ConsoleError>> {
        let Ok(mut dev) = self.consoles.get_mut(console) else {
            warn!("Console: no DevConsole on entity {}", console);
            return None;
        };
        dev.submit_line(line, &self.registry)
    }

    /// Print on one console.
    pub fn print(&mut self, console: Entity, level: PrintLevel, message: &str) {
        match self.consoles.get_mut(console) {
            Ok(mut dev) => dev.print(level, message),
            Err(_) => warn!("Console: no DevConsole on entity {}", console),
        }
    }

    /// Print on every console.
    pub fn print_all(&mut self, level: PrintLevel, message: &str) {
        for mut dev in &mut self.consoles {
            dev.print(level, message);
        }
    }

    /// Move the registry's queued global lines into every console.
    pub fn flush_global(&mut self) {
        let lines = self.registry.take_global();
        for mut dev in &mut self.consoles {
            for (level, message) in &lines {
                dev.print(*level, message);
            }
        }
    }
}
