//! Console messages for communication between layers.
//!
//! - Front-end -> registry: a submitted line ([`ConsoleInputEvent`])
//! - Game systems -> consoles: a line to show ([`ConsoleOutputEvent`])

use bevy::prelude::*;

use super::PrintLevel;

/// A line submitted on a console.
///
/// The plugin runs it against the registry and prints the result into the
/// `console` entity's [`DevConsole`](super::DevConsole).
///
/// # Examples
///
/// ```ignore
/// fn submit(mut input: MessageWriter<ConsoleInputEvent>, console: Single<Entity, With<DevConsole>>) {
///     input.write(ConsoleInputEvent::new(*console, "sv_cheats 1"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The console that submitted the line.
    pub console: Entity,
    /// The raw command line.
    pub line: String,
}

impl ConsoleInputEvent {
    pub fn new(console: Entity, line: impl Into<String>) -> Self {
        Self {
            console,
            line: line.into(),
        }
    }
}

/// A line to print, either on one console or on all of them.
#[derive(Message, Debug, Clone)]
pub struct ConsoleOutputEvent {
    /// `None` prints on every console.
    pub console: Option<Entity>,
    pub level: PrintLevel,
    pub message: String,
}

impl ConsoleOutputEvent {
    /// A line for every console.
    pub fn broadcast(level: PrintLevel, message: impl Into<String>) -> Self {
        Self {
            console: None,
            level,
            message: message.into(),
        }
    }

    /// A line for one console.
    pub fn to(console: Entity, level: PrintLevel, message: impl Into<String>) -> Self {
        Self {
            console: Some(console),
            level,
            message: message.into(),
        }
    }
}

/// Plugin that registers the console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_input_event() {
        let entity = Entity::PLACEHOLDER;
        let event = ConsoleInputEvent::new(entity, "sv_cheats 1");
        assert_eq!(event.console, entity);
        assert_eq!(event.line, "sv_cheats 1");
    }

    #[test]
    fn test_console_output_event() {
        let event = ConsoleOutputEvent::broadcast(PrintLevel::Error, "Something went wrong");
        assert_eq!(event.console, None);
        assert_eq!(event.level, PrintLevel::Error);

        let event = ConsoleOutputEvent::to(Entity::PLACEHOLDER, PrintLevel::Success, "done");
        assert_eq!(event.console, Some(Entity::PLACEHOLDER));
    }
}
