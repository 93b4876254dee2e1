//! Core console types.
//!
//! Everything here works without an `App`:
//! - [`ConsoleRegistry`] - Name → command map, dispatcher and global output queue
//! - [`ConCommand`] / [`ConVar`] - Commands with a typed value and their typed handle
//! - [`DevConsole`] - One console front-end (lines, input, history)
//! - [`ConsoleSink`] - Where command output goes
//! - [`tokenize`] - Command line tokenizer
//! - Messages and the [`Console`] system parameter for Bevy integration

mod builtin;
mod completion;
mod concommand;
mod console;
mod convar;
mod error;
mod events;
mod history;
mod matcher;
mod registry;
mod sink;
mod tokenizer;
mod trie;

pub use builtin::{assign_variable, register_builtins};
pub use completion::CompletionSuggestion;
pub use concommand::{CommandArgs, CommandContext, ConCommand, ConVarCallback};
pub use console::{Console, DevConsole};
pub use convar::{BoundedValue, ConVar, ConVarValue, VarKind, VarValue};
pub use error::ConsoleError;
pub use events::{ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent};
pub use history::{CommandHistory, MAX_COMMAND_HISTORY};
pub use matcher::{MatchResult, contains_match, match_and_sort, subsequence_match};
pub use registry::{ConsoleRegistry, HELP_HINT};
pub use sink::{ConsoleBuffer, ConsoleLine, ConsoleSink, LogSink, MAX_LINE_COUNT, PrintLevel};
pub use tokenizer::{TokenizeError, TokenizedCommand, tokenize, tokenize_string};
pub use trie::Trie;
