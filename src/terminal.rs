//! Terminal backend for headless builds.
//!
//! Lines read from stdin are submitted as console input; lines appended to
//! the console log are printed to stdout, oldest first, whenever the view
//! refreshes.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{ConsoleInputEvent, ConsoleRefreshEvent, ConsoleView, LogLine, LogSeverity};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .init_resource::<PrintedLines>()
            .add_systems(Update, read_stdin)
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
        Self { colored: false } // Disabled by default - causes issues on some terminals
    }
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

/// How many inserted lines have been printed so far.
#[derive(Resource, Default)]
struct PrintedLines(u64);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines().map_while(Result::ok) {
            let text = line.trim().to_string();
            if !text.is_empty() && sender.send(text).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(receiver: Res<StdinReceiver>, mut events: MessageWriter<ConsoleInputEvent>) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    while let Ok(line) = rx.try_recv() {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn write_stdout(
    mut refreshes: MessageReader<ConsoleRefreshEvent>,
    view: Res<ConsoleView>,
    mut printed: ResMut<PrintedLines>,
    config: Res<TerminalConfig>,
) {
    if refreshes.read().count() == 0 {
        return;
    }

    let new_lines = unprinted(&view, printed.0);
    printed.0 = view.appended;

    let mut stdout = io::stdout().lock();
    for line in new_lines {
        let text = line.render(false);
        let _ = if config.colored {
            writeln!(stdout, "{}{}\x1b[0m", ansi_color(line.severity), text)
        } else {
            writeln!(stdout, "{}", text)
        };
    }
    let _ = stdout.flush();
}

/// Rows inserted after `printed`, oldest first.
fn unprinted(view: &ConsoleView, printed: u64) -> impl Iterator<Item = &LogLine> {
    let fresh = view.appended.saturating_sub(printed);
    let fresh = usize::try_from(fresh).unwrap_or(usize::MAX).min(view.rows.len());
    view.rows[..fresh].iter().rev()
}

fn ansi_color(severity: LogSeverity) -> &'static str {
    match severity {
        LogSeverity::Info => "\x1b[0m",
        LogSeverity::Warning => "\x1b[33m",
        LogSeverity::Error | LogSeverity::Exception => "\x1b[31m",
        LogSeverity::Assert => "\x1b[36m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineBuffer;

    fn view_of(headers: &[&str], capacity: usize) -> ConsoleView {
        let mut buffer = LineBuffer::new(capacity);
        for header in headers {
            buffer.append(LogLine::info(*header));
        }
        let mut view = ConsoleView::default();
        view.rebuild(&buffer);
        view
    }

    #[test]
    fn test_unprinted_is_oldest_first() {
        let view = view_of(&["a", "b", "c"], 10);
        let lines: Vec<_> = unprinted(&view, 1).map(|l| l.header.as_str()).collect();
        assert_eq!(lines, vec!["b", "c"]);
    }

    #[test]
    fn test_unprinted_capped_by_evictions() {
        let view = view_of(&["a", "b", "c", "d"], 2);
        let lines: Vec<_> = unprinted(&view, 0).map(|l| l.header.as_str()).collect();
        assert_eq!(lines, vec!["c", "d"]);
        assert_eq!(unprinted(&view, 4).count(), 0);
    }
}
