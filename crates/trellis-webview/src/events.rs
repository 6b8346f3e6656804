//! Raw events delivered by the hosting environment.

/// Category of an inbound event, used to key subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    Closed,
}

/// Something the surface (or its host) reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Raw JSON posted by the other side.
    Message(String),
    /// The surface was closed by its environment.
    Closed,
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::Message(_) => EventKind::Message,
            SurfaceEvent::Closed => EventKind::Closed,
        }
    }
}

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded (DOMContentLoaded + resources).
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kinds() {
        assert_eq!(SurfaceEvent::Message("{}".into()).kind(), EventKind::Message);
        assert_eq!(SurfaceEvent::Closed.kind(), EventKind::Closed);
    }

    #[test]
    fn page_load_state_from_wry() {
        assert_eq!(
            PageLoadState::from(wry::PageLoadEvent::Started),
            PageLoadState::Started
        );
        assert_eq!(
            PageLoadState::from(wry::PageLoadEvent::Finished),
            PageLoadState::Finished
        );
    }
}
