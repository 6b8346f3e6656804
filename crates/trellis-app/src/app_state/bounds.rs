//! Window size to WebView bounds.

/// The whole client area of a `width` x `height` (physical pixels) window.
pub(super) fn client_area(width: u32, height: u32) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(width, height)),
    }
}
