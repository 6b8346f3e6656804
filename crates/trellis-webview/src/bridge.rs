//! JavaScript side of the bridge.
//!
//! Messages flow in both directions:
//! - **JS -> Rust**: content calls `window.trellis.emit(command, data)`, which
//!   posts `JSON.stringify({command, ...data})` through `window.ipc.postMessage`
//!   and lands in the surface's inbox.
//! - **Rust -> JS**: the host evaluates `window.trellis._receive({...})`, which
//!   routes the message through the content's own registry.
//!
//! The bridge follows the same contract as [`crate::client::DispatchClient`]:
//! one handler per command, duplicates and unknown commands reported back to
//! the host as `error` messages.

use trellis_common::Message;

/// Injected as an initialization script into every surface, before the
/// bootstrap document's own scripts run.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.trellis) {
        return;
    }
    var handlers = {};
    var has = Object.prototype.hasOwnProperty;

    function post(message) {
        window.ipc.postMessage(JSON.stringify(message));
    }

    function emit(command, data) {
        var message = {};
        if (data !== null && typeof data === 'object' && !Array.isArray(data)) {
            for (var key in data) {
                if (has.call(data, key)) {
                    message[key] = data[key];
                }
            }
        } else if (data !== undefined && data !== null) {
            message.data = data;
        }
        message.command = command;
        post(message);
    }

    function report(description) {
        emit('error', { ex: description });
    }

    window.trellis = {
        emit: emit,
        register: function(command, handler) {
            if (has.call(handlers, command)) {
                report('a command was already registered for "' + command + '"');
                return false;
            }
            handlers[command] = handler;
            return true;
        },
        _receive: function(message) {
            if (!message || typeof message.command !== 'string' || message.command === '') {
                report('malformed message: command is missing');
                return;
            }
            if (!has.call(handlers, message.command)) {
                if (message.command !== 'error') {
                    report('no command registered for "' + message.command + '"');
                }
                return;
            }
            try {
                handlers[message.command](message);
            } catch (e) {
                report('handler for "' + message.command + '" failed: ' + e);
            }
        }
    };
})();
"#;

/// Script that delivers `message` to the content's bridge.
pub fn js_deliver_message(message: &Message) -> String {
    format!("window.trellis && window.trellis._receive({});", message.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::{Context, Runtime};
    use serde_json::{json, Value};

    /// A bare QuickJS page: `window` is the global object and
    /// `window.ipc.postMessage` records what the bridge posts.
    struct Page {
        _runtime: Runtime,
        context: Context,
    }

    impl Page {
        fn new() -> Self {
            let runtime = Runtime::new().unwrap();
            let context = Context::full(&runtime).unwrap();
            let page = Self {
                _runtime: runtime,
                context,
            };
            page.run(
                "globalThis.window = globalThis;
                 window.ipc = { posted: [], postMessage: function(s) { this.posted.push(s); } };
                 globalThis.seen = [];",
            );
            page.run(BRIDGE_INIT_SCRIPT);
            page
        }

        fn run(&self, source: &str) {
            self.context
                .with(|ctx| ctx.eval::<(), _>(source))
                .unwrap();
        }

        fn json(&self, expr: &str) -> Value {
            let text: String = self
                .context
                .with(|ctx| ctx.eval::<String, _>(format!("JSON.stringify({expr})")))
                .unwrap();
            serde_json::from_str(&text).unwrap()
        }

        /// Every message posted to the host so far, parsed.
        fn posted(&self) -> Vec<Value> {
            let raw: Vec<String> = serde_json::from_value(self.json("window.ipc.posted")).unwrap();
            raw.iter().map(|s| serde_json::from_str(s).unwrap()).collect()
        }

        fn deliver(&self, message: &Message) {
            self.run(&js_deliver_message(message));
        }

        fn record(&self, command: &str) {
            self.run(&format!(
                "window.trellis.register({command:?}, function(m) {{ globalThis.seen.push(m); }});"
            ));
        }
    }

    fn error_text(message: &Value) -> &str {
        message["ex"].as_str().unwrap_or_default()
    }

    #[test]
    fn emit_posts_flat_message() {
        let page = Page::new();
        page.run("window.trellis.emit('app:start', { msg: 'Greetings User', command: 'hijack' });");
        assert_eq!(
            page.posted(),
            vec![json!({ "command": "app:start", "msg": "Greetings User" })]
        );
    }

    #[test]
    fn emit_wraps_scalars_and_drops_null() {
        let page = Page::new();
        page.run("window.trellis.emit('count', 3); window.trellis.emit('ping', null);");
        assert_eq!(
            page.posted(),
            vec![json!({ "command": "count", "data": 3 }), json!({ "command": "ping" })]
        );
    }

    #[test]
    fn delivered_message_reaches_registered_handler() {
        let page = Page::new();
        page.record("theme:changed");
        page.deliver(&Message::new("theme:changed", json!({ "dark": true })).unwrap());

        assert_eq!(
            page.json("globalThis.seen"),
            json!([{ "command": "theme:changed", "dark": true }])
        );
        assert!(page.posted().is_empty(), "no acknowledgement expected");
    }

    #[test]
    fn delivery_survives_hostile_payload_strings() {
        let page = Page::new();
        page.record("say");
        let text = "\");window.ipc.postMessage('x');//";
        page.deliver(&Message::new("say", json!({ "text": text })).unwrap());

        assert_eq!(page.json("globalThis.seen[0].text"), json!(text));
        assert!(page.posted().is_empty());
    }

    #[test]
    fn duplicate_registration_is_reported_and_first_handler_kept() {
        let page = Page::new();
        page.record("save");
        page.run("globalThis.second = window.trellis.register('save', function() { globalThis.seen.push('second'); });");
        assert_eq!(page.json("globalThis.second"), json!(false));

        let posted = page.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["command"], "error");
        assert!(error_text(&posted[0]).contains("\"save\""));

        page.deliver(&Message::new("save", Value::Null).unwrap());
        assert_eq!(page.json("globalThis.seen"), json!([{ "command": "save" }]));
    }

    #[test]
    fn unhandled_command_is_reported() {
        let page = Page::new();
        page.deliver(&Message::new("refresh", Value::Null).unwrap());

        let posted = page.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["command"], "error");
        assert!(error_text(&posted[0]).contains("refresh"));
    }

    #[test]
    fn unhandled_error_is_not_bounced() {
        let page = Page::new();
        page.deliver(&Message::error("no command registered for \"x\""));
        assert!(page.posted().is_empty());
    }

    #[test]
    fn registered_error_handler_receives_errors() {
        let page = Page::new();
        page.record("error");
        page.deliver(&Message::error("boom"));
        assert_eq!(page.json("globalThis.seen[0].ex"), json!("boom"));
        assert!(page.posted().is_empty());
    }

    #[test]
    fn throwing_handler_is_reported() {
        let page = Page::new();
        page.run("window.trellis.register('boom', function() { throw new Error('kaput'); });");
        page.deliver(&Message::new("boom", Value::Null).unwrap());

        let posted = page.posted();
        assert_eq!(posted.len(), 1);
        let text = error_text(&posted[0]);
        assert!(text.contains("\"boom\" failed"));
        assert!(text.contains("kaput"));
    }

    #[test]
    fn malformed_delivery_is_reported() {
        let page = Page::new();
        page.run("window.trellis._receive({}); window.trellis._receive({ command: '' });");

        let posted = page.posted();
        assert_eq!(posted.len(), 2);
        assert!(posted.iter().all(|m| error_text(m).contains("malformed")));
    }

    #[test]
    fn init_script_is_idempotent() {
        let page = Page::new();
        page.record("save");
        page.run(BRIDGE_INIT_SCRIPT);
        page.deliver(&Message::new("save", Value::Null).unwrap());
        assert_eq!(page.json("globalThis.seen.length"), json!(1));
    }
}
