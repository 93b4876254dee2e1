//! Submitted command history with up/down navigation.

use std::collections::VecDeque;

/// Number of submitted lines a console remembers.
pub const MAX_COMMAND_HISTORY: usize = 16;

/// Bounded history, most recent entry first.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::CommandHistory;
///
/// let mut history = CommandHistory::default();
/// history.record("help");
/// history.record("help");
/// history.record("say hi");
///
/// let entries: Vec<_> = history.iter().collect();
/// assert_eq!(entries, vec!["say hi", "help"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(MAX_COMMAND_HISTORY)
    }
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Remember a submitted line.
    ///
    /// Returns `false` when the line repeats the most recent entry, which is
    /// then kept as is.
    pub fn record(&mut self, line: &str) -> bool {
        if self.entries.front().is_some_and(|last| last == line) {
            return false;
        }

        self.entries.push_front(line.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    /// Entry `index` steps back, `0` being the most recent.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Iterate from the most recent entry to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
