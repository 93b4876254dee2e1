//! A quake-style developer console for Bevy, built around console variables.
//!
//! - **ConCommand**: a named command with a callback and a typed value
//! - **ConVar**: the typed handle to a registered variable, with optional bounds
//! - **ConsoleRegistry**: name lookup, aliases, dispatch and global output
//! - **DevConsole**: one console front-end (output lines, command line, history)
//!
//! # Features
//!
//! - `log-capture` (default): show `tracing` log events in every console
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `full`: Enable everything
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_convar_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::default())
//!         .add_systems(Startup, setup_console.after(register_builtin_commands))
//!         .run();
//! }
//!
//! fn setup_console(
//!     mut commands: Commands,
//!     mut registry: ResMut<ConsoleRegistry>,
//!     settings: Res<ConsoleSettings>,
//! ) {
//!     let gravity = registry
//!         .register_float_var("sv_gravity", 800.0, "World gravity", assign_variable, &[], true)
//!         .unwrap();
//!     gravity.set_min_value(0.0);
//!
//!     commands.spawn(settings.new_console());
//! }
//! ```

use bevy::prelude::*;

pub mod core;

pub use crate::core::{
    BoundedValue, CommandArgs, CommandContext, CommandHistory, CompletionSuggestion, ConCommand,
    ConVar, ConVarCallback, ConVarValue, Console, ConsoleBuffer, ConsoleError,
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleLine, ConsoleOutputEvent, ConsoleRegistry,
    ConsoleSink, DevConsole, LogSink, PrintLevel, VarKind, VarValue, assign_variable,
    register_builtins, tokenize,
};

// Log capture (feature-gated)
#[cfg(feature = "log-capture")]
pub mod logging;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

#[cfg(feature = "log-capture")]
pub use logging::{LogMessage, custom_log_layer};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalConsole, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CommandArgs, CommandContext, ConCommand, ConVar, ConVarValue, Console, ConsoleError,
        ConsoleInputEvent, ConsoleOutputEvent, ConsoleRegistry, ConsoleSink, DevConsole,
        PrintLevel, VarValue, assign_variable,
    };
    pub use crate::{ConsolePlugin, ConsoleSettings, register_builtin_commands};
}

/// Console configuration, inserted as a resource by [`ConsolePlugin`].
#[derive(Resource, Debug, Clone)]
pub struct ConsoleSettings {
    /// Submitted lines each console remembers.
    pub history_capacity: usize,
    /// Output lines each console keeps.
    pub line_capacity: usize,
    /// Install `help`, `clear`, `say` and friends at startup.
    pub register_builtins: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            history_capacity: crate::core::MAX_COMMAND_HISTORY,
            line_capacity: crate::core::MAX_LINE_COUNT,
            register_builtins: true,
        }
    }
}

impl ConsoleSettings {
    /// A console sized according to these settings.
    pub fn new_console(&self) -> DevConsole {
        DevConsole::with_capacity(self.history_capacity, self.line_capacity)
    }
}

/// Main console plugin.
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin {
///     settings: ConsoleSettings {
///         line_capacity: 200,
///         ..default()
///     },
/// }
/// ```
#[derive(Default)]
pub struct ConsolePlugin {
    pub settings: ConsoleSettings,
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .init_resource::<ConsoleRegistry>()
            .add_plugins(crate::core::ConsoleEventsPlugin);

        app.add_systems(
            Startup,
            register_builtin_commands.run_if(|settings: Res<ConsoleSettings>| settings.register_builtins),
        );

        // Input first so its output and any queued global lines land the same frame
        app.add_systems(
            Update,
            (dispatch_console_input, print_console_output, flush_global_output).chain(),
        );

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Register the built-in console commands.
///
/// Order user registrations `.after(register_builtin_commands)` to have
/// `help` list the built-ins first.
pub fn register_builtin_commands(mut registry: ResMut<ConsoleRegistry>) {
    if let Err(err) = register_builtins(&mut registry) {
        warn!("Console: failed to register built-in commands: {}", err);
    }
}

/// Run submitted lines on behalf of their console.
fn dispatch_console_input(mut input: MessageReader<ConsoleInputEvent>, mut console: Console) {
    for event in input.read() {
        debug!("Console: {} > {}", event.console, event.line);
        console.submit(event.console, &event.line);
    }
}

/// Print lines other systems sent to the consoles.
fn print_console_output(mut output: MessageReader<ConsoleOutputEvent>, mut console: Console) {
    for event in output.read() {
        match event.console {
            Some(entity) => console.print(entity, event.level, &event.message),
            None => console.print_all(event.level, &event.message),
        }
    }
}

/// Show the registry's queued global lines on every console.
fn flush_global_output(mut console: Console) {
    console.flush_global();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin::default());
        app
    }

    fn spawn_console(app: &mut App) -> Entity {
        let console = app.world().resource::<ConsoleSettings>().new_console();
        app.world_mut().spawn(console).id()
    }

    fn submit(app: &mut App, console: Entity, line: &str) {
        app.world_mut()
            .write_message(ConsoleInputEvent::new(console, line));
        app.update();
    }

    fn texts(app: &App, console: Entity) -> Vec<String> {
        app.world()
            .get::<DevConsole>(console)
            .map(|dev| dev.lines().map(|line| line.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_command_execution() {
        let mut app = app();
        app.add_systems(
            Startup,
            (|mut registry: ResMut<ConsoleRegistry>| {
                registry
                    .register_bool_var("test_cmd", false, "Test command", |_, args, ctx| {
                        ctx.console.success(&args.as_slice().join(","));
                        true
                    }, &["first"], false)
                    .unwrap();
            })
            .after(register_builtin_commands),
        );
        let console = spawn_console(&mut app);
        app.update();

        submit(&mut app, console, "test_cmd arg1 arg2");

        let dev = app.world().get::<DevConsole>(console).unwrap();
        let line = dev.lines().last().unwrap();
        assert_eq!(line.level, PrintLevel::Success);
        assert_eq!(line.text, "test_cmd,arg1,arg2");
        assert_eq!(dev.history().get(0), Some("test_cmd arg1 arg2"));
    }

    #[test]
    fn test_convar_get_set_via_input() {
        let mut app = app();
        app.add_systems(Startup, |mut registry: ResMut<ConsoleRegistry>| {
            let var = registry
                .register_int_var("test_var", 42, "Test variable", assign_variable, &[], true)
                .unwrap();
            var.set_min_value(0);
            var.set_max_value(200);
        });
        let console = spawn_console(&mut app);
        app.update();

        assert_eq!(app.world().resource::<ConsoleRegistry>().get_value_int("test_var"), 42);

        submit(&mut app, console, "test_var 100");
        assert_eq!(app.world().resource::<ConsoleRegistry>().get_value_int("test_var"), 100);

        submit(&mut app, console, "test_var 500");
        assert_eq!(app.world().resource::<ConsoleRegistry>().get_value_int("test_var"), 100);

        assert_eq!(
            texts(&app, console),
            vec![
                "ConVar [test_var] changed: 42 => 100",
                "Value is out of range, expected between 0 - 200",
            ]
        );
    }

    #[test]
    fn test_builtin_help_command() {
        let mut app = app();
        let console = spawn_console(&mut app);
        app.update();

        submit(&mut app, console, "help");

        let lines = texts(&app, console);
        assert_eq!(lines.first().map(String::as_str), Some("--------------------COMMANDS--------------------"));
        assert_eq!(lines.get(1).map(String::as_str), Some("clear - Clear the console"));
        assert_eq!(lines.get(2).map(String::as_str), Some("cls - Clear the console"));
        assert_eq!(lines.last().map(String::as_str), Some("------------------------------------------------"));

        let registry = app.world().resource::<ConsoleRegistry>();
        assert_eq!(lines.len(), registry.len() + 2);
    }

    #[test]
    fn test_output_only_reaches_requesting_console() {
        let mut app = app();
        let first = spawn_console(&mut app);
        let second = spawn_console(&mut app);
        app.update();

        submit(&mut app, first, "say hello");

        assert_eq!(texts(&app, first), vec!["hello"]);
        assert!(texts(&app, second).is_empty());
    }

    #[test]
    fn test_global_broadcast_reaches_all_consoles() {
        let mut app = app();
        app.add_systems(
            Startup,
            (|mut registry: ResMut<ConsoleRegistry>| {
                let _ = registry.register_bool_var("help", false, "", assign_variable, &[], false);
            })
            .after(register_builtin_commands),
        );
        let first = spawn_console(&mut app);
        let second = spawn_console(&mut app);
        app.update();

        let expected = vec!["ConVar help already exists!".to_string()];
        assert_eq!(texts(&app, first), expected);
        assert_eq!(texts(&app, second), expected);
    }

    #[test]
    fn test_output_event() {
        let mut app = app();
        let first = spawn_console(&mut app);
        let second = spawn_console(&mut app);
        app.update();

        app.world_mut()
            .write_message(ConsoleOutputEvent::broadcast(PrintLevel::Notice, "map loaded"));
        app.world_mut()
            .write_message(ConsoleOutputEvent::to(second, PrintLevel::Warning, "only you"));
        app.update();

        assert_eq!(texts(&app, first), vec!["map loaded"]);
        assert_eq!(texts(&app, second), vec!["map loaded", "only you"]);
    }

    #[test]
    fn test_clear_only_affects_requesting_console() {
        let mut app = app();
        let first = spawn_console(&mut app);
        let second = spawn_console(&mut app);
        app.update();

        app.world_mut()
            .write_message(ConsoleOutputEvent::broadcast(PrintLevel::Info, "hi"));
        app.update();

        submit(&mut app, first, "cls");

        assert!(texts(&app, first).is_empty());
        assert_eq!(texts(&app, second), vec!["hi"]);
    }

    #[test]
    fn test_unknown_console_entity_is_ignored() {
        let mut app = app();
        let console = spawn_console(&mut app);
        app.update();

        let stray = app.world_mut().spawn_empty().id();
        submit(&mut app, stray, "say lost");

        assert!(texts(&app, console).is_empty());
    }

    #[test]
    fn test_builtins_can_be_disabled() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin {
            settings: ConsoleSettings {
                register_builtins: false,
                ..default()
            },
        });
        app.update();

        assert!(app.world().resource::<ConsoleRegistry>().is_empty());
    }

    #[test]
    fn test_settings_size_consoles() {
        let settings = ConsoleSettings {
            history_capacity: 4,
            line_capacity: 8,
            register_builtins: true,
        };
        let console = settings.new_console();
        assert_eq!(console.history().capacity(), 4);
        assert_eq!(console.buffer().capacity(), 8);
    }
}
