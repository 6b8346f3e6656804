use std::rc::Rc;

use tracing::{debug, info};
use trellis_common::{BridgeError, DispatchRegistry, Outbox, SurfaceId};

use crate::channel::Inbox;
use crate::document::{BootstrapDocument, BootstrapParams};
use crate::events::{EventKind, SurfaceEvent};
use crate::host::{resource_roots, Surface, SurfaceHost, SurfaceOptions};
use crate::nonce::Nonce;

use super::handle::SurfaceHandle;
use super::{LifecycleState, Slot, SurfaceManager, SurfaceRequest};

impl<H: SurfaceHost> SurfaceManager<H> {
    /// Creation entry point.
    ///
    /// The first call builds the bootstrap document and creates the surface.
    /// Later calls only reveal it. Asset faults leave the manager
    /// uninitialized so the call can be retried.
    pub fn open(
        &mut self,
        request: &SurfaceRequest,
    ) -> Result<&mut SurfaceHandle<H::Surface>, BridgeError> {
        match self.slot {
            Slot::Uninitialized => {
                let handle = self.create(request).map_err(|err| {
                    self.report(&err);
                    err
                })?;
                info!(
                    surface_id = %handle.id,
                    name = %request.display_name,
                    "surface created"
                );
                self.slot = Slot::Active(handle);
            }
            Slot::Active(ref handle) => {
                debug!(surface_id = %handle.id, "surface already open, revealing");
                if let Err(err) = handle.surface.reveal() {
                    self.report(&err);
                }
            }
            Slot::Disposed => {
                let err = BridgeError::InvalidState {
                    operation: "open",
                    state: LifecycleState::Disposed.as_str(),
                };
                self.report(&err);
                return Err(err);
            }
        }

        match &mut self.slot {
            Slot::Active(handle) => Ok(handle),
            other => Err(BridgeError::InvalidState {
                operation: "open",
                state: other.state().as_str(),
            }),
        }
    }

    fn create(&mut self, request: &SurfaceRequest) -> Result<SurfaceHandle<H::Surface>, BridgeError> {
        let nonce = Nonce::generate();
        let document = BootstrapDocument::build(&BootstrapParams {
            app_root: &request.app_root,
            app_name: &request.display_name,
            nonce: &nonce,
            scheme: &self.scheme,
        })?;

        let options = SurfaceOptions {
            title: request.display_name.clone(),
            remain_active: request.remain_active,
            resource_roots: resource_roots(&request.app_root),
            scheme: self.scheme.clone(),
        };

        // Listen before the surface exists so nothing it posts during boot
        // is lost.
        let inbox = Inbox::new();
        let subscriptions = vec![
            inbox.subscribe(EventKind::Closed),
            inbox.subscribe(EventKind::Message),
        ];

        let surface = self
            .host
            .create_surface(&options, &document, inbox.clone())?;

        Ok(SurfaceHandle {
            id: SurfaceId::new(),
            surface,
            registry: DispatchRegistry::new(),
            outbox: Outbox::new(),
            inbox,
            subscriptions,
            document,
            notifier: Rc::clone(&self.notifier),
            released: false,
        })
    }

    /// Drain the surface's inbound events and dispatch them in order.
    ///
    /// A closed notification disposes the manager; anything queued behind
    /// it is dropped. Messages left in the outbox are posted last. Returns
    /// the number of messages a handler consumed.
    pub fn process_events(&mut self) -> usize {
        let events = match &self.slot {
            Slot::Active(handle) => handle.inbox.drain(),
            _ => return 0,
        };

        let mut consumed = 0;
        for event in events {
            let Slot::Active(handle) = &mut self.slot else {
                break;
            };
            match event {
                SurfaceEvent::Message(body) => {
                    if handle.route(&body) {
                        consumed += 1;
                    }
                }
                SurfaceEvent::Closed => {
                    info!(surface_id = %handle.id, "surface closed by its environment");
                    self.dispose();
                }
            }
        }
        if let Slot::Active(handle) = &self.slot {
            handle.flush();
        }
        consumed
    }

    /// Tear down the surface and every subscription. Disposing twice is a
    /// no-op.
    pub fn dispose(&mut self) {
        match std::mem::replace(&mut self.slot, Slot::Disposed) {
            Slot::Active(mut handle) => {
                handle.release();
            }
            Slot::Uninitialized => debug!("manager disposed before a surface was opened"),
            Slot::Disposed => {}
        }
    }
}
