//! Error taxonomy for registration, lookup and dispatch.
//!
//! None of these are fatal. Each one ends the current operation and its
//! `Display` text is what the requesting console (or every console, for
//! registration errors) gets to see.

use thiserror::Error;

use super::{TokenizeError, VarKind};

/// Errors reported by the console registry and its commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    /// A command or variable with this name is already registered.
    #[error("ConVar {name} already exists!")]
    DuplicateName { name: String },

    /// The alias name is already taken.
    #[error("Alias {alias} for {target} already exists!")]
    AliasCollision { alias: String, target: String },

    /// The alias points at a name nobody registered.
    #[error("Cannot create alias {alias}: {target} is not registered")]
    UnknownAliasTarget { alias: String, target: String },

    /// The first token of a line did not resolve.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// Fewer tokens than `arguments + 1`.
    #[error("Invalid argument for {name} usage:{usage}")]
    ArityMismatch { name: String, usage: String },

    /// A value outside the declared bounds.
    #[error("Value is out of range, expected {bounds}")]
    OutOfRange { name: String, bounds: String },

    /// A value of another kind was assigned through the type-erased API.
    #[error("ConVar {name} holds a {expected} value, got {found}")]
    TypeMismatch {
        name: String,
        expected: VarKind,
        found: VarKind,
    },

    /// Text that does not parse as the variable's kind.
    #[error("Invalid value '{value}' for {name}, expected {kind}")]
    InvalidValue {
        name: String,
        value: String,
        kind: VarKind,
    },

    /// The line could not be split into tokens.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl ConsoleError {
    /// Build the `<arg>` usage list shown by [`ConsoleError::ArityMismatch`].
    pub fn arity(name: &str, arguments: &[String]) -> Self {
        let usage = arguments
            .iter()
            .map(|arg| format!(" <{arg}>"))
            .collect::<String>();

        ConsoleError::ArityMismatch {
            name: name.to_string(),
            usage,
        }
    }
}
