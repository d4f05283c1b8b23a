//! Egui console example.
//!
//! Demonstrates the egui-based debug console with commands, keywords and
//! captured log output.
//!
//! Run with: `cargo run --example egui`
//!
//! Controls:
//! - Press ` (backquote) or § to toggle console
//! - Press Enter to submit commands
//! - Press Tab to accept autocomplete
//! - Press ArrowUp/ArrowDown to pick a suggestion, or walk history
//!
//! Try these commands:
//! - `help` - List all commands
//! - `spawn 5` / `despawn` - Spawn/despawn entities
//! - `tint red` - Recolor demo entities
//! - `collapse true` - Merge repeated lines

use bevy::log::LogPlugin;
use bevy::prelude::*;
use debug_console::prelude::*;

const COLORS: [(&str, Color); 3] = [
    ("red", Color::srgb(0.8, 0.2, 0.2)),
    ("green", Color::srgb(0.3, 0.7, 0.3)),
    ("blue", Color::srgb(0.2, 0.4, 0.9)),
];

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            custom_layer: debug_console::logging::custom_log_layer,
            ..default()
        }))
        .add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(ConsolePlugin::default())
        .add_systems(Startup, setup)
        .run();
}

/// Marker for demo entities.
#[derive(Component)]
struct DemoEntity;

fn setup(mut commands: Commands, mut console: Console) {
    commands.spawn(Camera2d);

    let _ = console.register_keyword("$color", |mode, _| match mode {
        KeywordMode::Help => vec!["color".to_string()],
        KeywordMode::Autocomplete => COLORS.iter().map(|(name, _)| name.to_string()).collect(),
    });

    let _ = console.register_cmd(
        Command::new("spawn", |args, world| {
            let count = args.int(0).unwrap_or(1);
            if !(1..=100).contains(&count) {
                return false;
            }
            for i in 0..count {
                world.spawn((
                    Sprite {
                        color: COLORS[1].1,
                        custom_size: Some(Vec2::new(50.0, 50.0)),
                        ..default()
                    },
                    Transform::from_xyz(i as f32 * 60.0 - 300.0, 0.0, 0.0),
                    DemoEntity,
                ));
            }
            info!("Spawned {} entities", count);
            true
        })
        .description("Spawn demo entities")
        .arg(ArgSlot::new([1, 5, 10])),
    );

    let _ = console.register_cmd(
        Command::new("despawn", |_args, world| {
            let entities: Vec<Entity> = world
                .query_filtered::<Entity, With<DemoEntity>>()
                .iter(world)
                .collect();
            let count = entities.len();
            for entity in entities {
                world.despawn(entity);
            }
            info!("Despawned {} entities", count);
            true
        })
        .description("Despawn all demo entities"),
    );

    let _ = console.register_cmd(
        Command::new("tint", |args, world| {
            let Some(color) = args
                .str(0)
                .and_then(|name| COLORS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)))
                .map(|(_, color)| *color)
            else {
                return false;
            };
            for mut sprite in world
                .query_filtered::<&mut Sprite, With<DemoEntity>>()
                .iter_mut(world)
            {
                sprite.color = color;
            }
            true
        })
        .description("Recolor demo entities")
        .arg(ArgSlot::new(["$color"])),
    );

    warn!("This warning shows up in the console too");
    info!("Press ` to open console. Try: help, spawn 5, tint red");
}
