//! Surface-side dispatch client.
//!
//! Runs inside the sandboxed content, mirroring the host's manager: one
//! registry, `emit` to the host, `register` for inbound commands. Content
//! has no operator to notify, so every fault is reported to the host as an
//! `error` message instead.

use serde_json::Value;
use tracing::{debug, warn};
use trellis_common::{BridgeError, Command, DispatchRegistry, Message, Outbox};

use crate::channel::{Inbox, Subscription};
use crate::events::{EventKind, SurfaceEvent};

/// The surface's outbound primitive towards the host.
pub trait HostChannel {
    fn post_message(&self, message: &Message) -> Result<(), BridgeError>;
}

/// Dispatch client living inside a surface.
pub struct DispatchClient<C: HostChannel> {
    channel: C,
    registry: DispatchRegistry,
    outbox: Outbox,
    inbox: Inbox,
    _subscription: Subscription,
}

impl<C: HostChannel> DispatchClient<C> {
    /// Subscribe once to `inbox`, where the environment queues everything
    /// the host posts.
    pub fn new(channel: C, inbox: Inbox) -> Self {
        let subscription = inbox.subscribe(EventKind::Message);
        Self {
            channel,
            registry: DispatchRegistry::new(),
            outbox: Outbox::new(),
            inbox,
            _subscription: subscription,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Queue for handlers that reply while being dispatched.
    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    /// Post `{command, ...payload}` to the host. An empty command is never
    /// posted; the fault is reported instead.
    pub fn emit(&self, command: impl Into<Command>, payload: Value) -> Result<(), BridgeError> {
        let message = Message::new(command, payload).map_err(|err| {
            self.report(&err);
            err
        })?;
        self.channel.post_message(&message)
    }

    /// Register a handler for host commands. A duplicate is reported to
    /// the host and the first handler stays.
    pub fn register<F>(&mut self, command: impl Into<Command>, handler: F) -> Result<(), BridgeError>
    where
        F: FnMut(&Message) + 'static,
    {
        let result = self.registry.register(command, handler);
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    /// Dispatch everything the host posted since the last call. Returns the
    /// number of messages a handler consumed.
    pub fn process_events(&mut self) -> usize {
        let mut consumed = 0;
        for event in self.inbox.drain() {
            let SurfaceEvent::Message(body) = event else {
                continue;
            };
            let message = match Message::from_json(&body) {
                Ok(message) => message,
                Err(err) => {
                    self.report(&err);
                    continue;
                }
            };
            let dispatched = self.registry.dispatch(&message);
            self.flush();
            match dispatched {
                Ok(()) => consumed += 1,
                // Reporting an unhandled error would bounce it straight back.
                Err(BridgeError::UnhandledCommand(_)) if *message.command() == Command::Error => {
                    debug!(message = ?message.payload(), "unhandled error from host");
                }
                Err(err) => self.report(&err),
            }
        }
        self.flush();
        consumed
    }

    fn flush(&self) {
        for message in self.outbox.take() {
            if let Err(err) = self.channel.post_message(&message) {
                warn!(error = %err, command = %message.command(), "failed to post queued message");
            }
        }
    }

    fn report(&self, err: &BridgeError) {
        warn!(error = %err, "reporting fault to host");
        if let Err(e) = self.channel.post_message(&Message::error(err.to_string())) {
            warn!(error = %e, "failed to report fault to host");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use trellis_common::ERROR_FIELD;

    #[derive(Clone, Default)]
    struct RecordingChannel {
        sent: Rc<RefCell<Vec<Message>>>,
    }

    impl HostChannel for RecordingChannel {
        fn post_message(&self, message: &Message) -> Result<(), BridgeError> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn client() -> (DispatchClient<RecordingChannel>, RecordingChannel, Inbox) {
        let channel = RecordingChannel::default();
        let inbox = Inbox::new();
        (
            DispatchClient::new(channel.clone(), inbox.clone()),
            channel,
            inbox,
        )
    }

    fn error_text(message: &Message) -> String {
        message
            .get(ERROR_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn construction_subscribes_to_inbound_channel() {
        let (_client, _channel, inbox) = client();
        assert!(inbox.is_subscribed(EventKind::Message));
        assert!(inbox.push_message(r#"{"command":"ping"}"#));
    }

    #[test]
    fn emit_posts_flat_message() {
        let (client, channel, _inbox) = client();
        client
            .emit("app:start", json!({ "msg": "Greetings User" }))
            .unwrap();

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&sent[0].to_json()).unwrap(),
            json!({ "command": "app:start", "msg": "Greetings User" })
        );
    }

    #[test]
    fn inbound_message_reaches_handler_once() {
        let (mut client, channel, inbox) = client();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        client
            .register("theme:changed", move |m: &Message| {
                sink.borrow_mut().push(m.clone())
            })
            .unwrap();

        inbox.push_message(r#"{"command":"theme:changed","dark":true}"#);
        assert_eq!(client.process_events(), 1);

        assert_eq!(
            *seen.borrow(),
            vec![Message::new("theme:changed", json!({ "dark": true })).unwrap()]
        );
        assert!(channel.sent.borrow().is_empty(), "no acknowledgement expected");
    }

    #[test]
    fn emit_with_empty_command_is_not_posted() {
        let (client, channel, _inbox) = client();
        let err = client.emit("", json!({ "msg": "lost" })).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedMessage(ref reason) if reason == "command is empty"));

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1, "only the fault report goes out");
        assert_eq!(sent[0].command(), &Command::Error);
        assert!(error_text(&sent[0]).contains("command is empty"));
        assert!(sent[0].get("msg").is_none());
    }

    #[test]
    fn handler_reply_is_posted_after_it_returns() {
        let (mut client, channel, inbox) = client();
        let outbox = client.outbox();
        client
            .register("ping", move |_: &Message| {
                outbox.emit("pong", Value::Null).unwrap();
            })
            .unwrap();

        inbox.push_message(r#"{"command":"ping"}"#);
        assert_eq!(client.process_events(), 1);

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command(), &Command::from("pong"));
    }

    #[test]
    fn duplicate_registration_is_reported_to_host_with_key() {
        let (mut client, channel, _inbox) = client();
        client.register("save", |_: &Message| {}).unwrap();
        let err = client.register("save", |_: &Message| {}).unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateRegistration(_)));

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command(), &Command::Error);
        assert!(error_text(&sent[0]).contains("\"save\""));
    }

    #[test]
    fn unhandled_command_is_reported_to_host() {
        let (mut client, channel, inbox) = client();
        inbox.push_message(r#"{"command":"refresh"}"#);
        assert_eq!(client.process_events(), 0);

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(error_text(&sent[0]).contains("refresh"));
    }

    #[test]
    fn unhandled_error_from_host_is_not_bounced() {
        let (mut client, channel, inbox) = client();
        inbox.push_message(r#"{"command":"error","ex":"no command registered"}"#);
        client.process_events();
        assert!(channel.sent.borrow().is_empty());
    }

    #[test]
    fn malformed_message_is_reported() {
        let (mut client, channel, inbox) = client();
        inbox.push_message("[1, 2]");
        client.process_events();

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(error_text(&sent[0]).contains("malformed"));
    }

    #[test]
    fn dropping_client_unsubscribes() {
        let (client, _channel, inbox) = client();
        drop(client);
        assert!(!inbox.is_subscribed(EventKind::Message));
    }
}
