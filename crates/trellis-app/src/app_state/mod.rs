//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the surface manager and the operator
//! notifications raised by the bridge.

mod bounds;
mod core;
mod event_handler;
mod init;
mod notifier;
mod surface;

pub use self::core::TrellisApp;
