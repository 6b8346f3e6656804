//! `SurfaceHost` backed by a `wry` child WebView.
//!
//! The host owns the parent window handle and builds one child WebView per
//! surface. Inbound IPC lands in the surface's inbox; the window owner calls
//! [`WryHost::notify_closed`] when the window goes away.

use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, warn};
use trellis_common::{BridgeError, Message};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::bridge::{js_deliver_message, BRIDGE_INIT_SCRIPT};
use crate::channel::Inbox;
use crate::content::ContentProvider;
use crate::document::BootstrapDocument;
use crate::host::{Surface, SurfaceHost, SurfaceOptions};

mod handlers;

pub use handlers::is_navigation_allowed;

/// Builder settings applied to every WebView the host creates.
#[derive(Debug, Clone)]
pub struct WryHostSettings {
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub bounds: wry::Rect,
}

impl Default for WryHostSettings {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            user_agent: None,
            bounds: wry::Rect::default(),
        }
    }
}

/// Creates surfaces as child WebViews of a window.
pub struct WryHost<W> {
    window: W,
    settings: WryHostSettings,
    inbox: Option<Inbox>,
}

impl<W> WryHost<W>
where
    W: Deref,
    W::Target: HasWindowHandle + Sized,
{
    pub fn new(window: W, settings: WryHostSettings) -> Self {
        Self {
            window,
            settings,
            inbox: None,
        }
    }

    pub fn window(&self) -> &W::Target {
        &self.window
    }

    /// Bounds used for the next surface.
    pub fn set_bounds(&mut self, bounds: wry::Rect) {
        self.settings.bounds = bounds;
    }

    /// Tell the current surface's owner that the window is closing.
    pub fn notify_closed(&self) -> bool {
        match &self.inbox {
            Some(inbox) => inbox.push_closed(),
            None => false,
        }
    }
}

impl<W> SurfaceHost for WryHost<W>
where
    W: Deref,
    W::Target: HasWindowHandle + Sized,
{
    type Surface = WrySurface;

    fn create_surface(
        &mut self,
        options: &SurfaceOptions,
        document: &BootstrapDocument,
        inbox: Inbox,
    ) -> Result<WrySurface, BridgeError> {
        let provider = Arc::new(ContentProvider::with_roots(
            options
                .resource_roots
                .first()
                .cloned()
                .unwrap_or_default(),
            options.resource_roots.clone(),
        ));

        let mut builder = WebViewBuilder::new()
            .with_bounds(self.settings.bounds)
            .with_devtools(self.settings.devtools)
            .with_focused(true)
            .with_initialization_script(BRIDGE_INIT_SCRIPT);

        if let Some(ua) = &self.settings.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = handlers::attach_ipc_handler(builder, inbox.clone());
        builder = handlers::attach_page_load_handler(builder);
        builder = handlers::attach_navigation_handler(builder, options.scheme.clone());
        builder = handlers::attach_custom_protocol(builder, &options.scheme, provider);

        let webview = builder
            .with_html(document.as_str())
            .build_as_child(self.window.deref())
            .map_err(|e| BridgeError::Surface(e.to_string()))?;

        debug!(title = %options.title, remain_active = options.remain_active, "WebView created");
        self.inbox = Some(inbox);

        Ok(WrySurface {
            webview: Some(webview),
            remain_active: options.remain_active,
        })
    }
}

/// One child WebView.
pub struct WrySurface {
    webview: Option<WebView>,
    remain_active: bool,
}

impl WrySurface {
    fn webview(&self) -> Result<&WebView, BridgeError> {
        self.webview
            .as_ref()
            .ok_or_else(|| BridgeError::Surface("webview already disposed".into()))
    }

    /// Reposition the WebView within its parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), BridgeError> {
        self.webview()?.set_bounds(bounds).map_err(surface_error)
    }

    /// Whether the surface was asked to keep its state while hidden. A
    /// child WebView always does, so this is informational.
    pub fn remain_active(&self) -> bool {
        self.remain_active
    }
}

impl Surface for WrySurface {
    fn post_message(&self, message: &Message) -> Result<(), BridgeError> {
        self.webview()?
            .evaluate_script(&js_deliver_message(message))
            .map_err(surface_error)
    }

    fn reveal(&self) -> Result<(), BridgeError> {
        let webview = self.webview()?;
        webview.set_visible(true).map_err(surface_error)?;
        webview.focus().map_err(surface_error)
    }

    fn dispose(&mut self) {
        if self.webview.take().is_some() {
            debug!("WebView released");
        } else {
            warn!("WebView disposed twice");
        }
    }
}

fn surface_error(e: wry::Error) -> BridgeError {
    BridgeError::Surface(e.to_string())
}
