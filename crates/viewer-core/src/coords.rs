//! Coordinate-space mapping
//!
//! Pointer events arrive in screen space and travel through four spaces:
//!
//! 1. screen: window/client coordinates of the pointer
//! 2. viewport: relative to the scroll container's top-left, clamped to it
//! 3. content: the full scrollable extent; viewport plus scroll offset
//! 4. page-native: relative to one page, in the document's own units
//!
//! Every function here is pure.

use doc_model::{Coord, Rect, Size};

/// Where the scroll container sits on screen and how far it is scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Screen position of the viewport's top-left corner.
    pub origin: Coord,
    /// Visible size of the viewport.
    pub size: Size,
    /// Vertical scroll offset. Content does not scroll horizontally.
    pub scroll_top: f32,
}

impl ViewportGeometry {
    pub fn new(origin: Coord, size: Size, scroll_top: f32) -> Self {
        Self { origin, size, scroll_top }
    }

    /// Same viewport, scrolled to `scroll_top`.
    pub fn scrolled_to(self, scroll_top: f32) -> Self {
        Self { scroll_top, ..self }
    }
}

/// Make `screen` relative to the viewport and clamp it inside.
pub fn screen_to_viewport(screen: Coord, origin: Coord, size: Size) -> Coord {
    Coord {
        x: (screen.x - origin.x).clamp(0.0, size.width),
        y: (screen.y - origin.y).clamp(0.0, size.height),
    }
}

pub fn viewport_to_content(viewport: Coord, scroll_top: f32) -> Coord {
    Coord { x: viewport.x, y: viewport.y + scroll_top }
}

pub fn screen_to_content(screen: Coord, viewport: &ViewportGeometry) -> Coord {
    let relative = screen_to_viewport(screen, viewport.origin, viewport.size);
    viewport_to_content(relative, viewport.scroll_top)
}

/// Express a content-space box relative to a page, in page-native units.
///
/// `page_native_width / page_content_box.width` is the pixel-to-native scale.
pub fn content_to_page_native(
    content_box: Rect,
    page_content_box: Rect,
    page_native_width: f32,
) -> Rect {
    let to_native = page_native_width / page_content_box.width;

    content_box
        .translated(-page_content_box.x, -page_content_box.y)
        .scaled(to_native)
}
