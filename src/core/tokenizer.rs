//! Command line tokenizer.
//!
//! Lines are split on ASCII spaces only; runs of spaces and leading or
//! trailing spaces never produce empty tokens. There is no quoting: a command
//! that wants free text (like `say`) joins its parameters back together.

use thiserror::Error;

/// Result of tokenizing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand<'a> {
    /// The command name (first token).
    pub command: &'a str,
    /// Every token, the command name included at index 0.
    pub tokens: Vec<&'a str>,
    /// The raw input line.
    pub raw: &'a str,
}

impl<'a> TokenizedCommand<'a> {
    /// The parameters after the command name.
    #[inline]
    pub fn params(&self) -> &[&'a str] {
        &self.tokens[1..]
    }
}

/// Tokenize error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// Nothing but spaces (or nothing at all).
    #[error("empty input")]
    EmptyInput,
}

/// Tokenize a command line into the command name and its parameters.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::tokenize;
///
/// let result = tokenize("  say   hi  there ").unwrap();
/// assert_eq!(result.command, "say");
/// assert_eq!(result.tokens, vec!["say", "hi", "there"]);
/// assert_eq!(result.params(), &["hi", "there"]);
/// ```
pub fn tokenize(input: &str) -> Result<TokenizedCommand<'_>, TokenizeError> {
    let tokens = tokenize_string(input);

    let Some(&command) = tokens.first() else {
        return Err(TokenizeError::EmptyInput);
    };

    Ok(TokenizedCommand {
        command,
        tokens,
        raw: input,
    })
}

/// Split a string on ASCII spaces, discarding empty fields.
pub fn tokenize_string(input: &str) -> Vec<&str> {
    input.split(' ').filter(|token| !token.is_empty()).collect()
}
