use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};
use trellis_common::{
    BridgeError, Command, DispatchRegistry, Message, Notification, Notifier, Outbox, SurfaceId,
    ERROR_FIELD,
};

use crate::channel::{Inbox, Subscription};
use crate::document::BootstrapDocument;
use crate::host::Surface;

use super::report;

/// Handle to the one surface a manager owns.
///
/// Owns the rendering context, the surface's dispatch registry and the
/// subscriptions taken out when it was created. All of them are released
/// together, once.
pub struct SurfaceHandle<S: Surface> {
    pub(super) id: SurfaceId,
    pub(super) surface: S,
    pub(super) registry: DispatchRegistry,
    pub(super) outbox: Outbox,
    pub(super) inbox: Inbox,
    pub(super) subscriptions: Vec<Subscription>,
    pub(super) document: BootstrapDocument,
    pub(super) notifier: Rc<dyn Notifier>,
    pub(super) released: bool,
}

impl<S: Surface> SurfaceHandle<S> {
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// The underlying rendering context.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The document the surface was booted with.
    pub fn document(&self) -> &BootstrapDocument {
        &self.document
    }

    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    /// Register a handler for messages coming from the surface.
    ///
    /// A duplicate is reported to the operator and returned; the existing
    /// handler stays.
    pub fn register<F>(&mut self, command: impl Into<Command>, handler: F) -> Result<(), BridgeError>
    where
        F: FnMut(&Message) + 'static,
    {
        let result = self.registry.register(command, handler);
        if let Err(err) = &result {
            report(self.notifier.as_ref(), err);
        }
        result
    }

    /// Queue handlers can emit through while a dispatch is running. Its
    /// messages are posted as soon as the handler returns.
    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    /// Post `{command, ...payload}` to the surface. An empty command is
    /// reported and nothing is posted.
    pub fn emit(&self, command: impl Into<Command>, payload: Value) -> Result<(), BridgeError> {
        let result = Message::new(command, payload).and_then(|message| self.post(&message));
        if let Err(err) = &result {
            report(self.notifier.as_ref(), err);
        }
        result
    }

    /// Post everything handlers queued in the outbox.
    pub(super) fn flush(&self) {
        for message in self.outbox.take() {
            if let Err(err) = self.post(&message) {
                report(self.notifier.as_ref(), &err);
            }
        }
    }

    fn post(&self, message: &Message) -> Result<(), BridgeError> {
        debug!(surface_id = %self.id, command = %message.command(), "emitting to surface");
        self.surface.post_message(message)
    }

    /// Parse and dispatch one raw inbound message. Returns `true` if a
    /// handler consumed it.
    pub(super) fn route(&mut self, body: &str) -> bool {
        let message = match Message::from_json(body) {
            Ok(message) => message,
            Err(err) => {
                warn!(surface_id = %self.id, body_len = body.len(), "inbound message rejected");
                report(self.notifier.as_ref(), &err);
                self.echo(&err);
                return false;
            }
        };

        debug!(surface_id = %self.id, command = %message.command(), "dispatching inbound message");
        let dispatched = self.registry.dispatch(&message);
        self.flush();
        match dispatched {
            Ok(()) => true,
            Err(BridgeError::UnhandledCommand(_)) if *message.command() == Command::Error => {
                self.surface_fault(&message);
                true
            }
            Err(err) => {
                report(self.notifier.as_ref(), &err);
                self.echo(&err);
                false
            }
        }
    }

    /// Release every subscription and then the surface. Only the first call
    /// does anything.
    pub(super) fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        while let Some(mut subscription) = self.subscriptions.pop() {
            subscription.dispose();
        }
        self.surface.dispose();
        info!(surface_id = %self.id, "surface released");
        true
    }

    /// Tell the surface about a fault it caused.
    fn echo(&self, err: &BridgeError) {
        if let Err(e) = self.surface.post_message(&Message::error(err.to_string())) {
            warn!(surface_id = %self.id, error = %e, "failed to echo error to surface");
        }
    }

    /// An `error` from the surface with no registered handler goes to the
    /// operator. It is never echoed back.
    fn surface_fault(&self, message: &Message) {
        let description = message
            .get(ERROR_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("unspecified error");
        warn!(surface_id = %self.id, description, "surface reported an error");
        self.notifier
            .notify(Notification::error("Surface error", description));
    }
}

impl<S: Surface> Drop for SurfaceHandle<S> {
    fn drop(&mut self) {
        self.release();
    }
}
