//! Output side of the console.
//!
//! The registry never talks to a widget directly. It writes leveled lines to
//! a [`ConsoleSink`], which is whatever the front-end provides: a
//! [`ConsoleBuffer`] behind a [`DevConsole`](super::DevConsole), stdout, or
//! the log.

use std::collections::VecDeque;
use std::fmt;
use std::time::SystemTime;

use bevy::prelude::*;

/// Maximum number of lines a console keeps before dropping the oldest.
pub const MAX_LINE_COUNT: usize = 1000;

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintLevel {
    /// General output.
    #[default]
    Info,
    /// Something changed (ConVar notices).
    Notice,
    /// Suspicious but handled.
    Warning,
    /// An operation completed.
    Success,
    /// An operation was rejected.
    Error,
}

impl PrintLevel {
    /// Upper-case tag used when a line is rendered as text.
    pub fn tag(&self) -> &'static str {
        match self {
            PrintLevel::Info => "INFO",
            PrintLevel::Notice => "NOTICE",
            PrintLevel::Warning => "WARNING",
            PrintLevel::Success => "SUCCESS",
            PrintLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for PrintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Anything that can receive console output.
///
/// Only `print` and `clear` are required; the leveled helpers forward to
/// `print`.
pub trait ConsoleSink {
    /// Accept one line of text at the given level.
    fn print(&mut self, level: PrintLevel, message: &str);

    /// Drop everything shown so far.
    fn clear(&mut self);

    fn info(&mut self, message: &str) {
        self.print(PrintLevel::Info, message);
    }

    fn notice(&mut self, message: &str) {
        self.print(PrintLevel::Notice, message);
    }

    fn warning(&mut self, message: &str) {
        self.print(PrintLevel::Warning, message);
    }

    fn success(&mut self, message: &str) {
        self.print(PrintLevel::Success, message);
    }

    fn error(&mut self, message: &str) {
        self.print(PrintLevel::Error, message);
    }
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleLine {
    /// Monotonic sequence number within the owning buffer.
    pub seq: u64,
    /// Severity.
    pub level: PrintLevel,
    /// The text.
    pub text: String,
    /// When the line was written.
    pub time: SystemTime,
}

/// Format a SystemTime as `HH:MM:SS` (UTC).
fn format_time(t: SystemTime) -> String {
    let duration = t.duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = duration.as_secs();
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = format!("[{}]", self.level.tag());
        write!(f, "[{}] {:<10} {}", format_time(self.time), tag, self.text)
    }
}

/// Bounded line storage (drop-oldest).
#[derive(Debug, Clone)]
pub struct ConsoleBuffer {
    lines: VecDeque<ConsoleLine>,
    capacity: usize,
    next_seq: u64,
}

impl Default for ConsoleBuffer {
    fn default() -> Self {
        Self::new(MAX_LINE_COUNT)
    }
}

impl ConsoleBuffer {
    /// Create a buffer holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&mut self, level: PrintLevel, text: impl Into<String>) {
        self.lines.push_back(ConsoleLine {
            seq: self.next_seq,
            level,
            text: text.into(),
            time: SystemTime::now(),
        });
        self.next_seq += 1;

        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Iterate over the stored lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    /// Lines written after the line with sequence number `seq`.
    pub fn lines_after(&self, seq: Option<u64>) -> impl Iterator<Item = &ConsoleLine> {
        self.lines
            .iter()
            .filter(move |line| seq.is_none_or(|seen| line.seq > seen))
    }

    /// The most recent line.
    pub fn last(&self) -> Option<&ConsoleLine> {
        self.lines.back()
    }

    /// Number of stored lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of stored lines.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl ConsoleSink for ConsoleBuffer {
    fn print(&mut self, level: PrintLevel, message: &str) {
        self.push(level, message);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Sink that forwards everything to the Bevy log.
///
/// Useful for running commands from code where no console is around.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ConsoleSink for LogSink {
    fn print(&mut self, level: PrintLevel, message: &str) {
        match level {
            PrintLevel::Error => error!("{}", message),
            PrintLevel::Warning => warn!("{}", message),
            PrintLevel::Info | PrintLevel::Notice | PrintLevel::Success => info!("{}", message),
        }
    }

    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_push_and_levels() {
        let mut buffer = ConsoleBuffer::default();
        buffer.info("hello");
        buffer.error("boom");

        let lines: Vec<_> = buffer.lines().map(|l| (l.level, l.text.as_str())).collect();
        assert_eq!(lines, vec![(PrintLevel::Info, "hello"), (PrintLevel::Error, "boom")]);
    }

    #[test]
    fn test_buffer_drops_oldest() {
        let mut buffer = ConsoleBuffer::new(3);
        for i in 0..5 {
            buffer.info(&i.to_string());
        }

        let texts: Vec<_> = buffer.lines().map(|l| l.text.clone()).collect();
        assert_eq!(texts, vec!["2", "3", "4"]);
        assert_eq!(buffer.last().map(|l| l.seq), Some(4));
    }

    #[test]
    fn test_buffer_clear_keeps_sequence() {
        let mut buffer = ConsoleBuffer::default();
        buffer.info("a");
        buffer.clear();
        assert!(buffer.is_empty());

        buffer.info("b");
        assert_eq!(buffer.last().map(|l| l.seq), Some(1));
    }

    #[test]
    fn test_lines_after() {
        let mut buffer = ConsoleBuffer::default();
        buffer.info("a");
        buffer.info("b");
        buffer.info("c");

        assert_eq!(buffer.lines_after(None).count(), 3);
        let after: Vec<_> = buffer.lines_after(Some(0)).map(|l| l.text.as_str()).collect();
        assert_eq!(after, vec!["b", "c"]);
    }

    #[test]
    fn test_line_display() {
        let line = ConsoleLine {
            seq: 0,
            level: PrintLevel::Notice,
            text: "changed".to_string(),
            time: SystemTime::UNIX_EPOCH,
        };
        assert_eq!(line.to_string(), "[00:00:00] [NOTICE]   changed");
    }
}
