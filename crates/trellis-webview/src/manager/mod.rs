//! Display surface lifecycle management.
//!
//! `SurfaceManager` owns at most one surface at a time. It moves through
//! `Uninitialized → Active → Disposed`; `Disposed` is terminal. A second
//! `open` while active only reveals the existing surface.

use std::path::PathBuf;
use std::rc::Rc;

use serde_json::Value;
use tracing::warn;
use trellis_common::{BridgeError, Command, LogNotifier, Message, Notification, Notifier, Outbox};

use crate::host::SurfaceHost;

mod handle;
mod lifecycle;


pub use handle::SurfaceHandle;

/// Protocol used for asset locators unless configured otherwise.
pub const DEFAULT_SCHEME: &str = "trellis";

/// Where the manager is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Active,
    Disposed,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Active => "active",
            LifecycleState::Disposed => "disposed",
        }
    }
}

/// Arguments of the creation entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRequest {
    /// Directory holding the prebuilt bundle and its manifest.
    pub app_root: PathBuf,
    /// Title of the surface and of its document.
    pub display_name: String,
    /// Keep the surface's state while hidden.
    pub remain_active: bool,
}

impl SurfaceRequest {
    pub fn new(app_root: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            app_root: app_root.into(),
            display_name: display_name.into(),
            remain_active: false,
        }
    }

    pub fn remain_active(mut self, remain_active: bool) -> Self {
        self.remain_active = remain_active;
        self
    }
}

enum Slot<S: crate::host::Surface> {
    Uninitialized,
    Active(SurfaceHandle<S>),
    Disposed,
}

impl<S: crate::host::Surface> Slot<S> {
    fn state(&self) -> LifecycleState {
        match self {
            Slot::Uninitialized => LifecycleState::Uninitialized,
            Slot::Active(_) => LifecycleState::Active,
            Slot::Disposed => LifecycleState::Disposed,
        }
    }
}

/// Host-side owner of one display surface.
pub struct SurfaceManager<H: SurfaceHost> {
    host: H,
    slot: Slot<H::Surface>,
    notifier: Rc<dyn Notifier>,
    scheme: String,
}

impl<H: SurfaceHost> SurfaceManager<H> {
    /// Create a manager that will build its surface through `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            slot: Slot::Uninitialized,
            notifier: Rc::new(LogNotifier),
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    /// Send operator notifications to `notifier` instead of the log.
    pub fn with_notifier(mut self, notifier: Rc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use `scheme` for asset locators.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.slot.state()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.slot, Slot::Active(_))
    }

    pub fn handle(&self) -> Option<&SurfaceHandle<H::Surface>> {
        match &self.slot {
            Slot::Active(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn handle_mut(&mut self) -> Option<&mut SurfaceHandle<H::Surface>> {
        match &mut self.slot {
            Slot::Active(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Register a handler on the active surface's registry.
    pub fn register<F>(&mut self, command: impl Into<Command>, handler: F) -> Result<(), BridgeError>
    where
        F: FnMut(&Message) + 'static,
    {
        match &mut self.slot {
            Slot::Active(handle) => handle.register(command, handler),
            other => {
                let err = BridgeError::InvalidState {
                    operation: "register",
                    state: other.state().as_str(),
                };
                report(self.notifier.as_ref(), &err);
                Err(err)
            }
        }
    }

    /// The active surface's outbox, for handlers that reply while being
    /// dispatched.
    pub fn outbox(&self) -> Option<Outbox> {
        self.handle().map(SurfaceHandle::outbox)
    }

    /// Post `{command, ...payload}` to the active surface.
    pub fn emit(&self, command: impl Into<Command>, payload: Value) -> Result<(), BridgeError> {
        match &self.slot {
            Slot::Active(handle) => handle.emit(command, payload),
            other => {
                let err = BridgeError::InvalidState {
                    operation: "emit",
                    state: other.state().as_str(),
                };
                report(self.notifier.as_ref(), &err);
                Err(err)
            }
        }
    }

    fn report(&self, err: &BridgeError) {
        report(self.notifier.as_ref(), err);
    }
}

/// Surface a fault to the operator, once.
pub(crate) fn report(notifier: &dyn Notifier, err: &BridgeError) {
    warn!(error = %err, "bridge fault");
    notifier.notify(Notification::from(err));
}
