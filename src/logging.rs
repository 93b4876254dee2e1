//! Custom [LogPlugin](bevy::log::LogPlugin) functionality.
//!
//! Captured log events are printed into every [`DevConsole`](crate::DevConsole).
//! Events logged by this crate itself are skipped: they already reach the
//! consoles as regular output.

use std::sync::mpsc;
use std::time::SystemTime;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{Console, PrintLevel};

/// Add log capture via [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(LogPlugin {
///     custom_layer: custom_log_layer,
///     ..default()
/// }));
/// ```
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogMessage>();
    app.insert_non_send_resource(CapturedLogEvents(receiver));
    app.add_systems(PostUpdate, (transfer_log_events, print_log_messages).chain());

    LogCaptureLayer::new(sender)
}

/// A captured [`tracing`] event.
#[derive(Message, Debug, Clone)]
pub struct LogMessage {
    /// The message contents.
    pub message: String,
    /// The module or explicit target the event was logged under.
    pub target: &'static str,
    pub level: Level,
    /// The time the log occurred.
    pub time: SystemTime,
}

/// Console level for a log level.
pub fn print_level(level: Level) -> PrintLevel {
    match level {
        Level::ERROR => PrintLevel::Error,
        Level::WARN => PrintLevel::Warning,
        Level::INFO => PrintLevel::Info,
        _ => PrintLevel::Notice,
    }
}

fn transfer_log_events(
    receiver: NonSend<CapturedLogEvents>,
    mut log_events: MessageWriter<LogMessage>,
) {
    for msg in receiver.0.try_iter() {
        log_events.write(msg);
    }
}

fn print_log_messages(mut log_events: MessageReader<LogMessage>, mut console: Console) {
    for msg in log_events.read() {
        console.print_all(print_level(msg.level), &msg.message);
    }
}

/// Holds captured [`LogMessage`]s until [`transfer_log_events`] writes them.
struct CapturedLogEvents(mpsc::Receiver<LogMessage>);

/// A [`Layer`] that sends log events to [`CapturedLogEvents`].
struct LogCaptureLayer {
    sender: mpsc::Sender<LogMessage>,
}

impl LogCaptureLayer {
    fn new(sender: mpsc::Sender<LogMessage>) -> Self {
        Self { sender }
    }
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }

        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            // Receiver gone means the app shut down
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
                time: SystemTime::now(),
            });
        }
    }
}

/// Records the `message` field of an event.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConsoleRegistry, HELP_HINT, LogSink};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    /// Records every event, this crate's included.
    struct RecordLayer(Arc<Mutex<Vec<(Level, String)>>>);

    impl<S: Subscriber> Layer<S> for RecordLayer {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut message = None;
            event.record(&mut LogEventVisitor(&mut message));
            if let Some(message) = message {
                self.0.lock().push((*event.metadata().level(), message));
            }
        }
    }

    fn capture(log: impl FnOnce()) -> Vec<LogMessage> {
        let (sender, receiver) = mpsc::channel();
        let subscriber = tracing_subscriber::registry().with(LogCaptureLayer::new(sender));
        tracing::subscriber::with_default(subscriber, log);
        receiver.try_iter().collect()
    }

    #[test]
    fn test_layer_captures_message_and_level() {
        let captured = capture(|| {
            tracing::warn!(target: "game::physics", "slow frame: {}ms", 40);
        });

        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message, "slow frame: 40ms");
        assert_eq!(captured[0].target, "game::physics");
        assert_eq!(captured[0].level, Level::WARN);
    }

    #[test]
    fn test_layer_skips_own_target() {
        let captured = capture(|| {
            tracing::warn!(target: "bevy_convar_console::core", "duplicate");
            tracing::info!(target: "game", "kept");
        });

        let messages: Vec<_> = captured.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(messages, vec!["kept"]);
    }

    #[test]
    fn test_print_level() {
        assert_eq!(print_level(Level::ERROR), PrintLevel::Error);
        assert_eq!(print_level(Level::WARN), PrintLevel::Warning);
        assert_eq!(print_level(Level::INFO), PrintLevel::Info);
        assert_eq!(print_level(Level::DEBUG), PrintLevel::Notice);
        assert_eq!(print_level(Level::TRACE), PrintLevel::Notice);
    }

    #[test]
    fn test_log_messages_reach_consoles() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(crate::ConsolePlugin {
            settings: crate::ConsoleSettings {
                register_builtins: false,
                ..default()
            },
        });
        let layer = create_custom_log_layer(&mut app);
        let console = app.world_mut().spawn(crate::DevConsole::default()).id();

        let _ = layer.sender.send(LogMessage {
            message: "asset missing".to_string(),
            target: "game::assets",
            level: Level::ERROR,
            time: SystemTime::now(),
        });
        app.update();

        let dev = app.world().get::<crate::DevConsole>(console).unwrap();
        let line = dev.lines().last().unwrap();
        assert_eq!(line.level, PrintLevel::Error);
        assert_eq!(line.text, "asset missing");
    }

    #[test]
    fn test_log_sink_forwards_command_output() {
        let registry = ConsoleRegistry::with_builtins();
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(RecordLayer(Arc::clone(&events)));

        tracing::subscriber::with_default(subscriber, || {
            let mut sink = LogSink;
            registry.execute("say hello there", &mut sink).unwrap();
            registry.execute("find qqq", &mut sink).unwrap();
            let _ = registry.execute("missing", &mut sink);
        });

        assert_eq!(
            *events.lock(),
            vec![
                (Level::INFO, "hello there".to_string()),
                (Level::WARN, "No matches for 'qqq'".to_string()),
                (Level::ERROR, "Unknown command: missing".to_string()),
                (Level::INFO, HELP_HINT.to_string()),
            ]
        );
    }
}
