//! Viewer core: everything between raw pointer/scroll events and the
//! annotation store.
//!
//! - [`coords`]: screen, viewport, content and page-native coordinate spaces
//! - [`layout`]: the stacked page column in content space
//! - [`visibility`]: incremental visible-range tracking
//! - [`lifecycle`]: per-page render handles around the visible range
//! - [`selection`]: drag gestures that become annotations
//!
//! Document decoding and page rendering are reached only through the traits
//! in [`source`].

pub mod coords;
pub mod layout;
pub mod lifecycle;
pub mod selection;
pub mod source;
pub mod visibility;

pub use coords::{
    content_to_page_native, screen_to_content, screen_to_viewport, viewport_to_content,
    ViewportGeometry,
};
pub use layout::PageLayout;
pub use lifecycle::{LoadPass, LoadReport, PageLifecycleManager, DEFAULT_PRELOAD_MARGIN};
pub use selection::{SelectionEngine, SelectionOverlay, Tool};
pub use source::{DocumentHandle, DocumentSource, PageHandle, ViewerError};
pub use visibility::{visible_range, ItemExtents, ScrollWindow, VisibilityTracker, VisibleRange};
