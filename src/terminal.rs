//! Terminal backend for headless/dedicated server console.
//!
//! Spawns a console entity fed by stdin; whatever that console prints is
//! written to stdout.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::ConsoleSettings;
use crate::core::{ConsoleInputEvent, ConsoleLine, DevConsole, PrintLevel};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .add_systems(Startup, spawn_terminal_console)
            .add_systems(PreUpdate, read_stdin)
            .add_systems(PostUpdate, write_stdout);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        // Off by default, some terminals render the escapes verbatim
        Self { colored: false }
    }
}

/// Marks the console driven by the terminal.
#[derive(Component, Debug, Default)]
pub struct TerminalConsole {
    /// Sequence number of the last line written to stdout.
    printed: Option<u64>,
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            if sender.send(line).is_err() {
                break;
            }
        }
    })
}

fn spawn_terminal_console(mut commands: Commands, settings: Res<ConsoleSettings>) {
    commands.spawn((settings.new_console(), TerminalConsole::default()));
}

fn read_stdin(
    receiver: Res<StdinReceiver>,
    terminal: Query<Entity, With<TerminalConsole>>,
    mut input: MessageWriter<ConsoleInputEvent>,
) {
    let Ok(console) = terminal.single() else {
        return;
    };

    let rx = receiver.0.lock();
    while let Ok(line) = rx.try_recv() {
        input.write(ConsoleInputEvent::new(console, line));
    }
}

fn write_stdout(
    mut terminal: Query<(&DevConsole, &mut TerminalConsole)>,
    config: Res<TerminalConfig>,
) {
    let mut stdout = io::stdout().lock();

    for (console, mut state) in &mut terminal {
        for line in console.buffer().lines_after(state.printed) {
            let _ = write_line(&mut stdout, line, config.colored);
            state.printed = Some(line.seq);
        }
    }
    let _ = stdout.flush();
}

fn write_line(out: &mut impl Write, line: &ConsoleLine, colored: bool) -> io::Result<()> {
    if colored {
        writeln!(out, "{}{}\x1b[0m", color(line.level), line)
    } else {
        writeln!(out, "{}", line)
    }
}

fn color(level: PrintLevel) -> &'static str {
    match level {
        PrintLevel::Info => "\x1b[0m",
        PrintLevel::Notice => "\x1b[36m",
        PrintLevel::Warning => "\x1b[33m",
        PrintLevel::Success => "\x1b[32m",
        PrintLevel::Error => "\x1b[31m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConsoleBuffer;
    use std::time::SystemTime;

    #[test]
    fn test_write_line() {
        let line = ConsoleLine {
            seq: 0,
            level: PrintLevel::Error,
            text: "boom".to_string(),
            time: SystemTime::UNIX_EPOCH,
        };

        let mut plain = Vec::new();
        write_line(&mut plain, &line, false).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "[00:00:00] [ERROR]    boom\n");

        let mut colored = Vec::new();
        write_line(&mut colored, &line, true).unwrap();
        assert_eq!(
            String::from_utf8(colored).unwrap(),
            "\x1b[31m[00:00:00] [ERROR]    boom\x1b[0m\n"
        );
    }

    #[test]
    fn test_lines_written_once() {
        let mut buffer = ConsoleBuffer::default();
        let mut state = TerminalConsole::default();

        buffer.push(PrintLevel::Info, "a");
        let first: Vec<_> = buffer.lines_after(state.printed).map(|l| l.seq).collect();
        state.printed = first.last().copied();

        buffer.push(PrintLevel::Info, "b");
        let second: Vec<_> = buffer.lines_after(state.printed).map(|l| l.text.clone()).collect();
        assert_eq!(second, vec!["b"]);
    }
}
