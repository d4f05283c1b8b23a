//! Running command handlers against the world.
//!
//! Handlers live in [`CommandHandlers`] and are taken out for the duration
//! of the call, so a handler can borrow the registry or any other resource
//! (including `CommandHandlers` itself) through `&mut World`.

use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::{ArgValue, CommandArgs, CommandFailedEvent, CommandHandlers, CommandRegistry, ExecutionError};

/// Execute a command, reporting why it did not succeed.
///
/// A panicking handler is caught and put back, so the command stays usable.
/// Nothing is written to the world on failure; see [`execute_command`] for the
/// variant that notifies listeners.
pub fn try_execute_command(world: &mut World, name: &str, args: &[ArgValue]) -> Result<(), ExecutionError> {
    let known = world
        .get_resource::<CommandRegistry>()
        .is_some_and(|registry| registry.contains(name));
    if !known {
        return Err(ExecutionError::NotFound { name: name.to_string() });
    }

    // Take the handler out without holding a borrow on `CommandHandlers`
    let Some(mut handlers) = world.get_resource_mut::<CommandHandlers>() else {
        return Err(ExecutionError::MissingHandler { name: name.to_string() });
    };
    let Some(handler) = handlers.take(name) else {
        return Err(if handlers.is_running(name) {
            ExecutionError::Busy { name: name.to_string() }
        } else {
            ExecutionError::MissingHandler { name: name.to_string() }
        });
    };

    let cmd_args = CommandArgs::new(name, args);
    let result = panic::catch_unwind(AssertUnwindSafe(|| handler(&cmd_args, world)));

    // Always put the handler back, regardless of panic
    if let Some(mut handlers) = world.get_resource_mut::<CommandHandlers>() {
        handlers.put(name, handler);
    }

    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(ExecutionError::Rejected { name: name.to_string() }),
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(ExecutionError::Panicked {
                name: name.to_string(),
                message,
            })
        }
    }
}

/// Execute a command by name.
///
/// Returns the handler's result. When the command is unknown, or its handler
/// returns `false` or panics, a [`CommandFailedEvent`] is written and `false`
/// is returned.
pub fn execute_command(world: &mut World, name: &str, args: &[ArgValue]) -> bool {
    match try_execute_command(world, name, args) {
        Ok(()) => true,
        Err(error) => {
            debug!("Console: {}", error);
            world.write_message(CommandFailedEvent::new(error, args.to_vec()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Command, register_command};
    use bevy::ecs::message::Messages;

    #[derive(Resource, Default)]
    struct Toggle(bool);

    fn setup() -> World {
        let mut world = World::new();
        world.init_resource::<CommandRegistry>();
        world.init_resource::<CommandHandlers>();
        world.init_resource::<Messages<CommandFailedEvent>>();
        world.init_resource::<Toggle>();

        world.resource_scope(|world, mut registry: Mut<CommandRegistry>| {
            let mut handlers = world.resource_mut::<CommandHandlers>();
            register_command(
                &mut registry,
                &mut handlers,
                Command::new("test", |_, world| {
                    let mut toggle = world.resource_mut::<Toggle>();
                    toggle.0 = !toggle.0;
                    true
                }),
            )
            .unwrap();
            register_command(&mut registry, &mut handlers, Command::new("reject", |_, _| false)).unwrap();
            register_command(
                &mut registry,
                &mut handlers,
                Command::new("boom", |_, _| panic!("kaboom")),
            )
            .unwrap();
            register_command(
                &mut registry,
                &mut handlers,
                Command::new("recurse", |args, world| {
                    matches!(
                        try_execute_command(world, "recurse", args.as_slice()),
                        Err(ExecutionError::Busy { .. })
                    )
                }),
            )
            .unwrap();
        });

        world
    }

    fn failures(world: &mut World) -> Vec<CommandFailedEvent> {
        world
            .resource_mut::<Messages<CommandFailedEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_execute_flips_toggle_once_per_call() {
        let mut world = setup();

        assert!(execute_command(&mut world, "test", &[]));
        assert!(world.resource::<Toggle>().0);

        assert!(execute_command(&mut world, "test", &[]));
        assert!(!world.resource::<Toggle>().0);

        assert!(failures(&mut world).is_empty());
    }

    #[test]
    fn test_not_found_notifies_once() {
        let mut world = setup();

        assert!(!execute_command(&mut world, "test2", &[ArgValue::Int(1)]));

        let events = failures(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "test2");
        assert_eq!(events[0].error, ExecutionError::NotFound { name: "test2".into() });
        assert_eq!(events[0].args, vec![ArgValue::Int(1)]);
    }

    #[test]
    fn test_handler_returning_false_is_rejected() {
        let mut world = setup();

        assert_eq!(
            try_execute_command(&mut world, "reject", &[]),
            Err(ExecutionError::Rejected { name: "reject".into() })
        );
        assert!(!execute_command(&mut world, "reject", &[]));
        assert_eq!(failures(&mut world).len(), 1);
    }

    #[test]
    fn test_panic_is_caught_and_handler_restored() {
        let mut world = setup();

        let err = try_execute_command(&mut world, "boom", &[]);
        assert_eq!(
            err,
            Err(ExecutionError::Panicked {
                name: "boom".into(),
                message: "kaboom".into()
            })
        );
        assert!(world.resource::<CommandHandlers>().contains("boom"));
    }

    #[test]
    fn test_reentrant_call_is_busy() {
        let mut world = setup();
        assert_eq!(try_execute_command(&mut world, "recurse", &[]), Ok(()));
        assert!(world.resource::<CommandHandlers>().contains("recurse"));
    }

    #[test]
    fn test_registry_only_command_has_no_handler() {
        let mut world = setup();
        let _ = world
            .resource_mut::<CommandRegistry>()
            .register(Command::new("orphan", |_, _| true))
            .unwrap();

        assert_eq!(
            try_execute_command(&mut world, "orphan", &[]),
            Err(ExecutionError::MissingHandler { name: "orphan".into() })
        );
        assert!(!execute_command(&mut world, "orphan", &[]));
        assert_eq!(failures(&mut world)[0].error.to_string(), "Command 'orphan' has no handler");
    }

    #[test]
    fn test_handler_not_running_after_panic() {
        let mut world = setup();
        let _ = try_execute_command(&mut world, "boom", &[]);
        assert!(!world.resource::<CommandHandlers>().is_running("boom"));
    }
}
