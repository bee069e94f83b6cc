//! Drag gestures over the page column.
//!
//! A press records the touchdown point, every move refreshes the selection
//! overlay and (for shape tools) one preview annotation per visible page,
//! and the release turns the final drag box into a single bulk add action.
//! All points are in content space.

use crate::coords::content_to_page_native;
use crate::layout::PageLayout;
use crate::visibility::VisibleRange;
use doc_model::{Annotation, Color, Coord, DocumentAction, PageNumber, Rect};
use log::debug;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Move,
    Text,
    Rectangle,
}

impl Tool {
    /// Whether a drag with this tool leaves shapes on the pages it covers.
    pub fn produces_page_shapes(self) -> bool {
        matches!(self, Tool::Rectangle)
    }

    /// Whether the selection overlay is drawn filled rather than outlined.
    pub fn fills_selection(self) -> bool {
        matches!(self, Tool::Move)
    }
}

/// Raw drag box shown over the content, independent of pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOverlay {
    pub bounds: Rect,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging { touchdown: Coord, touchdown_page: usize },
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    tool: Tool,
    fill: Color,
    gesture: Gesture,
    preview: BTreeMap<PageNumber, Annotation>,
    overlay: Option<SelectionOverlay>,
}

impl SelectionEngine {
    pub fn new(tool: Tool, fill: Color) -> Self {
        Self { tool, fill, gesture: Gesture::Idle, preview: BTreeMap::new(), overlay: None }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switching tools abandons any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel();
        self.tool = tool;
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn set_fill(&mut self, fill: Color) {
        self.fill = fill;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Page the current gesture started on.
    pub fn touchdown_page(&self) -> Option<usize> {
        match self.gesture {
            Gesture::Dragging { touchdown_page, .. } => Some(touchdown_page),
            Gesture::Idle => None,
        }
    }

    pub fn preview(&self, page: PageNumber) -> Option<&Annotation> {
        self.preview.get(&page)
    }

    pub fn previews(&self) -> &BTreeMap<PageNumber, Annotation> {
        &self.preview
    }

    pub fn overlay(&self) -> Option<SelectionOverlay> {
        self.overlay
    }

    /// Start a gesture at `point`.
    ///
    /// The touchdown page is the first visible page whose bottom edge lies
    /// below the point, or the last visible page if none does.
    pub fn press(&mut self, point: Coord, visible: VisibleRange, layout: &PageLayout) {
        let touchdown_page = visible
            .indices()
            .find(|&index| layout.content_box(index).is_some_and(|page| page.bottom() > point.y))
            .unwrap_or(visible.end_index);

        self.preview.clear();
        self.overlay = None;
        self.gesture = Gesture::Dragging { touchdown: point, touchdown_page };
    }

    /// Refresh the overlay and previews. Ignored while idle.
    pub fn pointer_move(&mut self, point: Coord, visible: VisibleRange, layout: &PageLayout) {
        let Gesture::Dragging { touchdown, .. } = self.gesture else {
            return;
        };

        let drag = Rect::from_two_points(touchdown, point);
        if self.tool.produces_page_shapes() {
            self.preview = self.page_shapes(drag, visible.indices(), layout);
        }
        self.overlay = Some(SelectionOverlay { bounds: drag, filled: self.tool.fills_selection() });
    }

    /// Finish the gesture.
    ///
    /// Pages between the touchdown page and the current visible range are
    /// included, so a drag that scrolled its start out of view keeps it.
    /// Returns `None` when the drag covered no page or the tool makes no
    /// shapes.
    pub fn release(
        &mut self,
        point: Coord,
        visible: VisibleRange,
        layout: &PageLayout,
    ) -> Option<DocumentAction> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.preview.clear();
        self.overlay = None;

        let Gesture::Dragging { touchdown, touchdown_page } = gesture else {
            return None;
        };
        if !self.tool.produces_page_shapes() {
            return None;
        }

        let drag = Rect::from_two_points(touchdown, point);
        let pages = touchdown_page.min(visible.start_index)..=touchdown_page.max(visible.end_index);
        let per_page = self.page_shapes(drag, pages, layout);

        if per_page.is_empty() {
            debug!("drag {drag:?} touched no page");
            return None;
        }

        debug!("drag committed on {} page(s)", per_page.len());
        Some(DocumentAction::AddAnnotations { per_page })
    }

    /// Drop the gesture without producing anything.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.preview.clear();
        self.overlay = None;
    }

    fn page_shapes(
        &self,
        drag: Rect,
        pages: RangeInclusive<usize>,
        layout: &PageLayout,
    ) -> BTreeMap<PageNumber, Annotation> {
        let mut shapes = BTreeMap::new();

        for index in pages {
            let (Some(page_box), Some(native_width)) =
                (layout.content_box(index), layout.native_width(index))
            else {
                continue;
            };

            if let Some(overlap) = page_box.intersection(&drag) {
                let native = content_to_page_native(overlap, page_box, native_width);
                shapes.insert(PageNumber::from_index(index), Annotation::rectangle(native, self.fill));
            }
        }

        shapes
    }
}
