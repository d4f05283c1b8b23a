//! Terminal console example.
//!
//! Demonstrates using debug_console with stdin/stdout for headless applications
//! like dedicated servers.
//!
//! Run with: `cargo run --example terminal --no-default-features --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `collapse true` - Merge repeated lines
//! - `status` - Show server status
//! - `say hello` - Broadcast a message
//! - `quit` - Exit the application

use bevy::prelude::*;
use debug_console::{ArgSlot, Command, Console, ConsoleOutputEvent, LogSeverity};

/// Demo server state.
#[derive(Resource)]
struct ServerState {
    hostname: String,
    max_players: i32,
}

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(debug_console::ConsolePlugin::default())
        .insert_resource(ServerState {
            hostname: "My Server".to_string(),
            max_players: 32,
        })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut console: Console) {
    let _ = console.register_cmd(
        Command::new("status", |_args, world| {
            let state = world.resource::<ServerState>();
            let line = ConsoleOutputEvent::info("=== Status ===").with_body(format!(
                "Hostname: {}\nMax Players: {}",
                state.hostname, state.max_players
            ));
            world.write_message(line);
            true
        })
        .description("Show server status"),
    );

    let _ = console.register_cmd(
        Command::new("maxplayers", |args, world| {
            let Some(count) = args.int(0).filter(|n| (1..=64).contains(n)) else {
                return false;
            };
            world.resource_mut::<ServerState>().max_players = count;
            true
        })
        .description("Set the player limit (1-64)")
        .arg(ArgSlot::new([8, 16, 32, 64])),
    );

    let _ = console.register_cmd(
        Command::new("say", |args, world| {
            if args.is_empty() {
                return false;
            }
            world.write_message(ConsoleOutputEvent::new(
                format!("[SERVER] {}", args.join(" ")),
                "",
                LogSeverity::Warning,
            ));
            true
        })
        .description("Broadcast a message"),
    );

    let _ = console.register_cmd(
        Command::new("quit", |_args, world| {
            world.write_message(AppExit::Success);
            true
        })
        .description("Exit the application"),
    );
}
