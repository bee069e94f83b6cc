//! Incremental visible-range tracking
//!
//! Rather than scanning every page on each scroll event, the previous range
//! is adjusted with two pointers. For the small deltas produced by user
//! scrolling or resizing this touches only the pages whose visibility
//! changed; a programmatic jump degrades to a linear walk but still lands on
//! the correct range.

use crate::coords::ViewportGeometry;
use log::debug;
use std::ops::RangeInclusive;

/// Inclusive, 0-based range of visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl VisibleRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(start_index <= end_index, "inverted range {start_index}..={end_index}");
        Self { start_index, end_index }
    }

    pub fn single(index: usize) -> Self {
        Self { start_index: index, end_index: index }
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start_index..=self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// A range always holds at least one item.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Grow by `margin` on both sides, clipped to `item_count` items.
    pub fn expanded(&self, margin: usize, item_count: usize) -> Self {
        let last = item_count.saturating_sub(1);
        Self {
            start_index: self.start_index.saturating_sub(margin),
            end_index: self.end_index.saturating_add(margin).min(last),
        }
    }

    /// Smallest range covering both ranges.
    pub fn union(&self, other: &VisibleRange) -> Self {
        Self {
            start_index: self.start_index.min(other.start_index),
            end_index: self.end_index.max(other.end_index),
        }
    }
}

/// Vertical extent of each laid-out item, in content space.
pub trait ItemExtents {
    fn item_count(&self) -> usize;
    fn item_top(&self, index: usize) -> f32;
    fn item_bottom(&self, index: usize) -> f32;
}

/// The slice of content space currently shown by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWindow {
    pub top: f32,
    pub height: f32,
}

impl ScrollWindow {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

impl From<&ViewportGeometry> for ScrollWindow {
    fn from(viewport: &ViewportGeometry) -> Self {
        Self { top: viewport.scroll_top, height: viewport.size.height }
    }
}

fn above_window(items: &impl ItemExtents, window: ScrollWindow, index: usize) -> bool {
    items.item_bottom(index) <= window.top
}

fn below_window(items: &impl ItemExtents, window: ScrollWindow, index: usize) -> bool {
    items.item_top(index) >= window.bottom()
}

/// Adjust `previous` to the items that intersect `window`.
///
/// After the call the item before `start_index` (if any) is above the window
/// and the item after `end_index` (if any) is below it. Both ends are inside
/// the window unless no item intersects it at all (scrolled into a gap or
/// past the end), in which case the range collapses onto the nearest item.
///
/// `previous` may be stale or out of bounds; it is clamped first. `items`
/// must not be empty.
pub fn visible_range(
    previous: VisibleRange,
    window: ScrollWindow,
    items: &impl ItemExtents,
) -> VisibleRange {
    let count = items.item_count();
    debug_assert!(count > 0, "visible range of an empty item list");
    let last = count.saturating_sub(1);

    let above = |index| above_window(items, window, index);
    let below = |index| below_window(items, window, index);

    let mut start = previous.start_index.min(last);
    let mut end = previous.end_index.min(last);

    if above(start) {
        while start < last && above(start) {
            start += 1;
        }
    } else {
        while start > 0 && !above(start - 1) {
            start -= 1;
        }
    }

    if below(end) {
        while end > 0 && below(end) {
            end -= 1;
        }
    } else {
        while end < last && !below(end + 1) {
            end += 1;
        }
    }

    if end < start {
        end = start;
    }

    debug_assert!(start == 0 || above(start - 1));
    debug_assert!(end == last || below(end + 1));

    VisibleRange { start_index: start, end_index: end }
}

/// Owner of the current visible range.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    range: VisibleRange,
}

impl VisibilityTracker {
    /// Compute the initial range, starting the walk from the first item.
    pub fn new(window: ScrollWindow, items: &impl ItemExtents) -> Self {
        Self { range: visible_range(VisibleRange::single(0), window, items) }
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    /// Recompute after a scroll or resize. Returns the new range only if it
    /// differs from the previous one.
    pub fn update(&mut self, window: ScrollWindow, items: &impl ItemExtents) -> Option<VisibleRange> {
        let next = visible_range(self.range, window, items);
        if next == self.range {
            return None;
        }

        debug!(
            "visible range {}..={} -> {}..={}",
            self.range.start_index, self.range.end_index, next.start_index, next.end_index
        );
        self.range = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::Cell;

    /// Items stacked top to bottom with optional gaps, counting every probe.
    struct Column {
        tops: Vec<f32>,
        heights: Vec<f32>,
        probes: Cell<usize>,
    }

    impl Column {
        fn uniform(count: usize, height: f32) -> Self {
            Self::from_heights(vec![height; count], 0.0)
        }

        fn from_heights(heights: Vec<f32>, gap: f32) -> Self {
            let mut tops = Vec::with_capacity(heights.len());
            let mut cursor = 0.0;
            for height in &heights {
                tops.push(cursor);
                cursor += height + gap;
            }
            Self { tops, heights, probes: Cell::new(0) }
        }

        fn total_height(&self) -> f32 {
            let last = self.tops.len() - 1;
            self.tops[last] + self.heights[last]
        }

        fn take_probes(&self) -> usize {
            self.probes.replace(0)
        }
    }

    impl ItemExtents for Column {
        fn item_count(&self) -> usize {
            self.tops.len()
        }

        fn item_top(&self, index: usize) -> f32 {
            self.probes.set(self.probes.get() + 1);
            self.tops[index]
        }

        fn item_bottom(&self, index: usize) -> f32 {
            self.probes.set(self.probes.get() + 1);
            self.tops[index] + self.heights[index]
        }
    }

    fn in_window(items: &Column, window: ScrollWindow, index: usize) -> bool {
        !above_window(items, window, index) && !below_window(items, window, index)
    }

    fn assert_exact(items: &Column, window: ScrollWindow, range: VisibleRange) {
        let last = items.item_count() - 1;
        assert!(range.start_index <= range.end_index);
        assert!(in_window(items, window, range.start_index), "{range:?} start outside {window:?}");
        assert!(in_window(items, window, range.end_index), "{range:?} end outside {window:?}");
        assert!(range.start_index == 0 || above_window(items, window, range.start_index - 1));
        assert!(range.end_index == last || below_window(items, window, range.end_index + 1));
    }

    #[test]
    fn initial_range_covers_first_screen() {
        let items = Column::uniform(10, 1000.0);
        let tracker = VisibilityTracker::new(ScrollWindow::new(0.0, 1500.0), &items);
        assert_eq!(tracker.range(), VisibleRange::new(0, 1));
    }

    #[test]
    fn page_edges_touching_the_window_are_not_visible() {
        let items = Column::uniform(5, 1000.0);
        let range = visible_range(VisibleRange::single(0), ScrollWindow::new(1000.0, 1000.0), &items);
        assert_eq!(range, VisibleRange::single(1));
    }

    #[test]
    fn update_reports_only_changes() {
        let items = Column::uniform(10, 1000.0);
        let mut tracker = VisibilityTracker::new(ScrollWindow::new(0.0, 800.0), &items);

        assert_eq!(tracker.update(ScrollWindow::new(100.0, 800.0), &items), None);
        assert_eq!(
            tracker.update(ScrollWindow::new(500.0, 800.0), &items),
            Some(VisibleRange::new(0, 1))
        );
        assert_eq!(tracker.range(), VisibleRange::new(0, 1));
    }

    #[test]
    fn scrolling_down_never_moves_the_range_backwards() {
        let items = Column::uniform(40, 1000.0);
        let window_height = 900.0;
        let mut tracker = VisibilityTracker::new(ScrollWindow::new(0.0, window_height), &items);
        let mut previous = tracker.range();

        let mut top = 0.0;
        while top + window_height <= items.total_height() {
            let window = ScrollWindow::new(top, window_height);
            tracker.update(window, &items);
            let range = tracker.range();

            assert!(range.start_index >= previous.start_index);
            assert!(range.end_index >= previous.end_index);
            assert_exact(&items, window, range);

            previous = range;
            top += 37.0;
        }
    }

    #[test]
    fn small_scrolls_probe_a_constant_number_of_items() {
        let items = Column::uniform(10_000, 1000.0);
        let mut tracker = VisibilityTracker::new(ScrollWindow::new(0.0, 900.0), &items);
        items.take_probes();

        for step in 1..2_000 {
            tracker.update(ScrollWindow::new(step as f32 * 50.0, 900.0), &items);
            assert!(items.take_probes() <= 16, "scroll step {step} probed too many items");
        }
    }

    #[test]
    fn jumps_land_on_the_exact_range() {
        let items = Column::uniform(100, 1000.0);
        let mut tracker = VisibilityTracker::new(ScrollWindow::new(0.0, 900.0), &items);

        let far = ScrollWindow::new(72_500.0, 900.0);
        tracker.update(far, &items);
        assert_eq!(tracker.range(), VisibleRange::new(72, 73));

        let back = ScrollWindow::new(1_200.0, 700.0);
        tracker.update(back, &items);
        assert_eq!(tracker.range(), VisibleRange::single(1));
    }

    #[test]
    fn random_jumps_hold_postconditions() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let heights: Vec<f32> = (0..200).map(|_| rng.gen_range(50.0..1500.0)).collect();
        let items = Column::from_heights(heights, 0.0);
        let total = items.total_height();

        let mut range = VisibleRange::single(0);
        for _ in 0..2_000 {
            let height = rng.gen_range(100.0..3000.0);
            let top = rng.gen_range(0.0..(total - height));
            let window = ScrollWindow::new(top, height);

            range = visible_range(range, window, &items);
            assert_exact(&items, window, range);
        }
    }

    #[test]
    fn stale_previous_range_is_clamped() {
        let items = Column::uniform(3, 1000.0);
        let stale = VisibleRange::new(7, 12);
        let range = visible_range(stale, ScrollWindow::new(1500.0, 200.0), &items);
        assert_eq!(range, VisibleRange::single(1));
    }

    #[test]
    fn window_inside_a_gap_collapses_to_next_item() {
        let items = Column::from_heights(vec![100.0, 100.0, 100.0], 50.0);
        let range = visible_range(VisibleRange::single(0), ScrollWindow::new(105.0, 40.0), &items);
        assert_eq!(range, VisibleRange::single(1));
    }

    #[test]
    fn range_helpers() {
        let range = VisibleRange::new(1, 1);
        assert_eq!(range.expanded(1, 3), VisibleRange::new(0, 2));
        assert_eq!(VisibleRange::new(0, 0).expanded(1, 1), VisibleRange::new(0, 0));
        assert_eq!(range.union(&VisibleRange::new(4, 6)), VisibleRange::new(1, 6));
        assert!(range.contains(1));
        assert!(!range.contains(2));
        assert_eq!(VisibleRange::new(2, 5).len(), 4);
    }
}
