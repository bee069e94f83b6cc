//! Vertical page layout in content space.
//!
//! Pages are stacked top to bottom at a fixed on-screen width. A page's
//! height follows its native aspect ratio once known; until then the
//! fallback aspect ratio sizes a placeholder.

use crate::visibility::ItemExtents;
use doc_model::{Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    page_width: f32,
    page_gap: f32,
    boxes: Vec<Rect>,
    native_widths: Vec<f32>,
}

impl PageLayout {
    /// Lay out one page per entry of `native_sizes`.
    ///
    /// Pages without a known size use `fallback` (the first page that ever
    /// loaded), or a square if nothing has loaded yet.
    pub fn compute(
        page_width: f32,
        page_gap: f32,
        native_sizes: &[Option<Size>],
        fallback: Option<Size>,
    ) -> Self {
        let fallback_ratio = fallback.map(|size| usable_ratio(size.aspect_ratio())).unwrap_or(1.0);
        let fallback_width = fallback.map(|size| size.width).unwrap_or(page_width);

        let mut boxes = Vec::with_capacity(native_sizes.len());
        let mut native_widths = Vec::with_capacity(native_sizes.len());
        let mut cursor = 0.0;

        for size in native_sizes {
            let ratio = size.map(|size| usable_ratio(size.aspect_ratio())).unwrap_or(fallback_ratio);
            let height = page_width / ratio;

            boxes.push(Rect::new(0.0, cursor, page_width, height));
            native_widths.push(size.map(|size| size.width).unwrap_or(fallback_width));
            cursor += height + page_gap;
        }

        Self { page_width, page_gap, boxes, native_widths }
    }

    pub fn page_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_gap(&self) -> f32 {
        self.page_gap
    }

    /// Box of page `index` in content space.
    pub fn content_box(&self, index: usize) -> Option<Rect> {
        self.boxes.get(index).copied()
    }

    /// Width of page `index` in native units, used to scale content-space
    /// boxes into the page's own coordinates.
    pub fn native_width(&self, index: usize) -> Option<f32> {
        self.native_widths.get(index).copied()
    }

    /// Scroll offset that puts the top of page `index` at the viewport top.
    pub fn scroll_offset_for_page(&self, index: usize) -> f32 {
        match self.boxes.last() {
            Some(last) => self.boxes.get(index).unwrap_or(last).y,
            None => 0.0,
        }
    }

    pub fn total_height(&self) -> f32 {
        self.boxes.last().map(|last| last.bottom()).unwrap_or(0.0)
    }
}

fn usable_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

impl ItemExtents for PageLayout {
    fn item_count(&self) -> usize {
        self.boxes.len()
    }

    fn item_top(&self, index: usize) -> f32 {
        self.boxes[index].y
    }

    fn item_bottom(&self, index: usize) -> f32 {
        self.boxes[index].bottom()
    }
}
