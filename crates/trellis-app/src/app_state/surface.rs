//! Surface activation, inbox polling and operator feedback.

use serde_json::Value;
use trellis_common::{Message, Notification, Notifier};

use super::bounds::client_area;
use super::core::TrellisApp;
use super::notifier::window_title;

/// Sent by the content once it has mounted.
pub(super) const START_COMMAND: &str = "app:start";

impl TrellisApp {
    /// Open the surface, or reveal it if it is already open.
    ///
    /// Handlers are registered only when the surface is first created.
    pub(super) fn activate(&mut self) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        let first_open = !manager.is_active();

        let handle = match manager.open(&self.request) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "Surface unavailable");
                return;
            }
        };
        if !first_open {
            return;
        }

        let notifier = self.notifier.clone();
        let registered = handle.register(START_COMMAND, move |message: &Message| {
            let text = message
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default();
            tracing::info!(payload = ?message.payload(), "Surface started");
            notifier.notify(Notification::info("Surface started", text));
        });
        if let Err(e) = registered {
            tracing::debug!(error = %e, "start handler not registered");
        }
    }

    /// Dispatch everything the surface posted since the last call.
    pub(super) fn poll_surface(&mut self) {
        if let Some(manager) = self.manager.as_mut() {
            let consumed = manager.process_events();
            if consumed > 0 {
                tracing::debug!(consumed, "surface messages dispatched");
            }
        }
    }

    /// Keep the WebView covering the window's client area.
    pub(super) fn sync_surface_bounds(&mut self, width: u32, height: u32) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        let bounds = client_area(width, height);
        manager.host_mut().set_bounds(bounds);
        if let Some(handle) = manager.handle() {
            if let Err(e) = handle.surface().set_bounds(bounds) {
                tracing::warn!(error = %e, "Failed to resize surface");
            }
        }
    }

    /// Show the latest operator notification in the window title.
    pub(super) fn refresh_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let latest = self.notifier.latest();
        let title = window_title(&self.request.display_name, latest.as_ref());
        if title != self.last_title {
            window.set_title(&title);
            self.last_title = title;
        }
    }

    /// Tell the surface its window is going away and let the manager
    /// dispose it.
    pub(super) fn shutdown(&mut self) {
        if let Some(manager) = self.manager.as_mut() {
            if manager.host().notify_closed() {
                manager.process_events();
            }
            manager.dispose();
        }
        self.should_exit = true;
    }
}
