//! TrellisApp struct definition and constructor.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use trellis_config::TrellisConfig;
use trellis_webview::{SurfaceManager, SurfaceRequest, WryHost};
use winit::window::Window;

use super::notifier::OperatorNotifier;

/// How often the surface inbox is drained while the loop is idle.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub(super) type AppSurfaceManager = SurfaceManager<WryHost<Arc<Window>>>;

/// Top-level application state.
pub struct TrellisApp {
    pub(super) config: TrellisConfig,
    pub(super) request: SurfaceRequest,
    pub(super) window: Option<Arc<Window>>,
    pub(super) manager: Option<AppSurfaceManager>,
    pub(super) notifier: Rc<OperatorNotifier>,
    pub(super) last_title: String,
    pub(super) should_exit: bool,
}

impl TrellisApp {
    pub fn new(config: TrellisConfig, request: SurfaceRequest) -> Self {
        Self {
            config,
            request,
            window: None,
            manager: None,
            notifier: Rc::new(OperatorNotifier::default()),
            last_title: String::new(),
            should_exit: false,
        }
    }
}
