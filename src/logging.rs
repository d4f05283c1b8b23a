//! Custom [LogPlugin](bevy::log::LogPlugin) functionality.
//!
//! Every `tracing` record becomes a console line: ERROR maps to
//! [`LogSeverity::Error`], WARN to [`LogSeverity::Warning`] and everything
//! else to [`LogSeverity::Info`]. The source location goes into the body.

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use std::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{ConsoleOutputEvent, LogSeverity};

/// A function that forwards log records to the developer console via
/// [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(LogPlugin {
///     custom_layer: debug_console::logging::custom_log_layer,
///     ..default()
/// }));
/// ```
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<ConsoleOutputEvent>();
    app.insert_non_send_resource(CapturedLogRecords(receiver));
    app.add_systems(PostUpdate, transfer_log_records);

    LogCaptureLayer { sender }
}

/// A captured log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// The message contents.
    pub message: String,
    /// The level of verbosity.
    pub level: Level,
    /// The source file, if known.
    pub file: Option<&'static str>,
    /// The line in `file`, if known.
    pub line: Option<u32>,
}

impl LogRecord {
    /// Severity of the console line for this record.
    pub fn severity(&self) -> LogSeverity {
        severity_for(self.level)
    }

    /// `file:line`, or empty when the location is unknown.
    pub fn location(&self) -> String {
        match (self.file, self.line) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.to_string(),
            _ => String::new(),
        }
    }
}

impl From<LogRecord> for ConsoleOutputEvent {
    fn from(record: LogRecord) -> Self {
        let body = record.location();
        let severity = record.severity();
        ConsoleOutputEvent::new(record.message, body, severity)
    }
}

/// Map a `tracing` level onto a console severity.
pub fn severity_for(level: Level) -> LogSeverity {
    match level {
        Level::ERROR => LogSeverity::Error,
        Level::WARN => LogSeverity::Warning,
        _ => LogSeverity::Info,
    }
}

/// Transfers records from [`CapturedLogRecords`] to [`MessageWriter<ConsoleOutputEvent>`].
fn transfer_log_records(receiver: NonSend<CapturedLogRecords>, mut output: MessageWriter<ConsoleOutputEvent>) {
    for record in receiver.0.try_iter() {
        output.write(record.into());
    }
}

/// This struct temporarily stores [`LogRecord`]s before they are
/// written as [`ConsoleOutputEvent`]s by [`transfer_log_records`].
struct CapturedLogRecords(mpsc::Receiver<LogRecord>);

/// A [`Layer`] that captures log events and saves them to [`CapturedLogRecords`].
struct LogCaptureLayer {
    sender: mpsc::Sender<LogRecord>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S> for LogCaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let metadata = event.metadata();
            let _ = self.sender.send(LogRecord {
                message,
                level: *metadata.level(),
                file: metadata.file(),
                line: metadata.line(),
            });
        }
    }
}

/// A [`Visit`]or that records log messages that are transferred to [`LogCaptureLayer`].
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // Only log out messages
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
