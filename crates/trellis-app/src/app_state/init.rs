//! Window creation and surface manager setup.

use std::rc::Rc;
use std::sync::Arc;

use trellis_common::Notifier;
use trellis_webview::{SurfaceManager, WryHost, WryHostSettings};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use super::bounds::client_area;
use super::core::TrellisApp;

impl TrellisApp {
    /// Create the window and the manager that will host the surface in it.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(self.request.display_name.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 768.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let size = window.inner_size();
        let settings = WryHostSettings {
            devtools: self.config.webview.devtools,
            user_agent: self.config.webview.user_agent.clone(),
            bounds: client_area(size.width, size.height),
        };
        let notifier: Rc<dyn Notifier> = self.notifier.clone();
        let manager = SurfaceManager::new(WryHost::new(Arc::clone(&window), settings))
            .with_notifier(notifier)
            .with_scheme(self.config.webview.scheme.clone());

        tracing::info!(scheme = %self.config.webview.scheme, "Window created");
        self.last_title = self.request.display_name.clone();
        self.window = Some(window);
        self.manager = Some(manager);
        true
    }
}
