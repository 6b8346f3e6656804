//! Deferred outbound messages.
//!
//! Handlers run while their owner is mid-dispatch and cannot reach its
//! `emit`. They push replies into an [`Outbox`] instead; the owner posts
//! everything queued once the handler returns, in push order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::errors::BridgeError;
use crate::message::{Command, Message};

/// Cloneable queue of messages waiting to be posted.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: Rc<RefCell<VecDeque<Message>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `{command, ...payload}`. The message is built now, so an
    /// empty command fails here rather than at flush time.
    pub fn emit(&self, command: impl Into<Command>, payload: Value) -> Result<(), BridgeError> {
        let message = Message::new(command, payload)?;
        self.queue.borrow_mut().push_back(message);
        Ok(())
    }

    /// Remove and return everything queued so far.
    pub fn take(&self) -> Vec<Message> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
