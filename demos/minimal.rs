//! Minimal headless console example.
//!
//! Demonstrates using debug_console programmatically without any UI.
//! Useful for testing or custom UI implementations.
//!
//! Run with: `cargo run --example minimal --no-default-features`

use std::time::Duration;

use bevy::prelude::*;
use debug_console::prelude::*;
use debug_console::{ConsoleRefreshEvent, ConsoleView};

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin {
            refresh_delay: Duration::ZERO,
            ..default()
        })
        .add_systems(Startup, setup)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .add_systems(PostUpdate, (print_view, report_failures))
        .run();
}

fn setup(mut console: Console) {
    let _ = console.register_keyword("$greeting", |mode, _| match mode {
        KeywordMode::Help => vec!["greeting".to_string()],
        KeywordMode::Autocomplete => vec!["hello".to_string(), "howdy".to_string()],
    });

    // Register a command
    let _ = console.register_cmd(
        Command::new("greet", |args, world| {
            let greeting = args.str(0).unwrap_or("hello");
            let times = args.int(1).unwrap_or(1);
            if times < 1 {
                return false;
            }
            for _ in 0..times {
                world.write_message(ConsoleOutputEvent::info(format!("{greeting}, World!")));
            }
            true
        })
        .description("Greet the world")
        .arg(ArgSlot::new(["$greeting"]))
        .arg(ArgSlot::new([1, 3])),
    );

    println!("Console initialized. Registered: greet");
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    println!("\n--- Sending test commands ---");

    events.write(ConsoleInputEvent::new("help"));
    events.write(ConsoleInputEvent::new("help greet"));
    events.write(ConsoleInputEvent::new("collapse true"));
    events.write(ConsoleInputEvent::new("greet howdy 3"));
    events.write(ConsoleInputEvent::new("greet hello 0"));
    events.write(ConsoleInputEvent::new("teleport home"));
}

/// Print the view whenever it refreshes.
fn print_view(mut refreshes: MessageReader<ConsoleRefreshEvent>, view: Res<ConsoleView>) {
    if refreshes.read().count() == 0 {
        return;
    }

    println!("\n--- Console ({} lines) ---", view.rows.len());
    for row in view.render().collect::<Vec<_>>().into_iter().rev() {
        println!("{row}");
    }
}

fn report_failures(mut failures: MessageReader<CommandFailedEvent>) {
    for failure in failures.read() {
        println!("[failed] {}", failure.error);
    }
}
