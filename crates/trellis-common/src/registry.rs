//! Command → handler table used on both sides of the bridge.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::errors::BridgeError;
use crate::message::{Command, Message};

/// A message handler. Its return value is never observed by the sender.
pub type Handler = Box<dyn FnMut(&Message)>;

/// Maps each command to exactly one handler.
///
/// The registry only signals faults through its return values; reporting
/// them is up to the owner.
#[derive(Default)]
pub struct DispatchRegistry {
    handlers: HashMap<Command, Handler>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` for `command`.
    ///
    /// A second registration for the same command is rejected and the
    /// first handler stays in effect.
    pub fn register<F>(&mut self, command: impl Into<Command>, handler: F) -> Result<(), BridgeError>
    where
        F: FnMut(&Message) + 'static,
    {
        let command = command.into();
        if self.handlers.contains_key(&command) {
            return Err(BridgeError::DuplicateRegistration(command.to_string()));
        }
        debug!(command = %command, "handler registered");
        self.handlers.insert(command, Box::new(handler));
        Ok(())
    }

    /// Run the handler for `message` to completion.
    pub fn dispatch(&mut self, message: &Message) -> Result<(), BridgeError> {
        match self.handlers.get_mut(message.command()) {
            Some(handler) => {
                handler(message);
                Ok(())
            }
            None => Err(BridgeError::UnhandledCommand(message.command().to_string())),
        }
    }

    pub fn contains(&self, command: &Command) -> bool {
        self.handlers.contains_key(command)
    }

    /// Registered commands, in no particular order.
    pub fn commands(&self) -> Vec<&Command> {
        self.handlers.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for DispatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("commands", &self.commands())
            .finish()
    }
}
