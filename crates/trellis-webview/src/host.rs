//! Boundary to the environment that actually renders surfaces.

use std::path::{Path, PathBuf};

use trellis_common::{BridgeError, Message};

use crate::channel::Inbox;
use crate::document::BootstrapDocument;

/// Subdirectories of the asset root a surface may also read from.
pub const RESOURCE_SUBDIRS: &[&str] = &["static", "static/media"];

/// How a surface should be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Title shown by the environment (tab, window).
    pub title: String,
    /// Keep the surface's state while it is hidden. Environments that
    /// cannot do this treat it as a hint.
    pub remain_active: bool,
    /// The only directories the surface may load resources from.
    pub resource_roots: Vec<PathBuf>,
    /// Custom protocol the document's locators use.
    pub scheme: String,
}

/// The asset root followed by its declared subdirectories.
pub fn resource_roots(app_root: &Path) -> Vec<PathBuf> {
    std::iter::once(app_root.to_path_buf())
        .chain(RESOURCE_SUBDIRS.iter().map(|sub| app_root.join(sub)))
        .collect()
}

/// One live rendering context.
pub trait Surface {
    /// Post a message to the content. Best effort, never acknowledged.
    fn post_message(&self, message: &Message) -> Result<(), BridgeError>;

    /// Bring the surface to the front.
    fn reveal(&self) -> Result<(), BridgeError>;

    /// Release the rendering context. Called at most once.
    fn dispose(&mut self);
}

/// Creates surfaces.
///
/// The host pushes everything the content posts, and the surface's own
/// closed notification, into `inbox`.
pub trait SurfaceHost {
    type Surface: Surface;

    fn create_surface(
        &mut self,
        options: &SurfaceOptions,
        document: &BootstrapDocument,
        inbox: Inbox,
    ) -> Result<Self::Surface, BridgeError>;
}
