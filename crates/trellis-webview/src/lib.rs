//! Display surface bridge for Trellis.
//!
//! Hosts a single prebuilt web bundle in a sandboxed surface and provides:
//! - A surface lifecycle manager (`Uninitialized → Active → Disposed`)
//! - Bootstrap document generation from the bundle's asset manifest
//! - Command dispatch in both directions over flat `{command, ...}` messages
//! - A `wry` host serving the bundle through a custom protocol

pub mod assets;
pub mod bridge;
pub mod channel;
pub mod client;
pub mod content;
pub mod document;
pub mod events;
pub mod host;
pub mod manager;
pub mod nonce;
pub mod wry_host;

pub use assets::{AssetKey, AssetLocator, AssetManifest, AssetResolver, MANIFEST_FILE};
pub use channel::{Inbox, Subscription};
pub use client::{DispatchClient, HostChannel};
pub use content::ContentProvider;
pub use document::{BootstrapDocument, BootstrapParams};
pub use events::{EventKind, PageLoadState, SurfaceEvent};
pub use host::{Surface, SurfaceHost, SurfaceOptions};
pub use manager::{LifecycleState, SurfaceHandle, SurfaceManager, SurfaceRequest, DEFAULT_SCHEME};
pub use nonce::Nonce;
pub use wry_host::{WryHost, WryHostSettings, WrySurface};
