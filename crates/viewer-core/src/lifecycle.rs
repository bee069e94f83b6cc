//! Page resource lifecycle
//!
//! One slot per page holds the page's render handle while the page is
//! inside the load window (visible range plus a preload margin). A pass
//! over a new visible range acquires the missing handles, then publishes
//! them and evicts everything outside the window in one step.
//!
//! Acquisition suspends, so passes are split in three:
//!
//! 1. [`PageLifecycleManager::begin_pass`] records the requested window and
//!    lists the pages to acquire.
//! 2. [`PageLifecycleManager::complete_acquisition`] stages each result.
//!    A handle for a page that is no longer wanted is released right away.
//! 3. [`PageLifecycleManager::finish_pass`] publishes. A pass superseded by
//!    a later `begin_pass` publishes nothing and releases what it staged,
//!    so the published slots always reflect the latest requested window.
//!
//! [`PageLifecycleManager::on_visibility_changed`] runs all three in order.

use crate::source::{DocumentHandle, PageHandle, ViewerError};
use crate::visibility::VisibleRange;
use doc_model::{PageNumber, Size};
use log::{debug, warn};

/// Default number of pages kept loaded on each side of the visible range.
pub const DEFAULT_PRELOAD_MARGIN: usize = 1;

/// One in-flight load pass.
///
/// Dropping a pass without finishing it releases everything it staged.
#[derive(Debug)]
pub struct LoadPass<P: PageHandle> {
    generation: u64,
    window: VisibleRange,
    missing: Vec<usize>,
    staged: Vec<(usize, P)>,
    failed: Vec<usize>,
}

impl<P: PageHandle> LoadPass<P> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load window requested by this pass.
    pub fn window(&self) -> VisibleRange {
        self.window
    }

    /// Pages without a handle when the pass began.
    pub fn missing(&self) -> &[usize] {
        &self.missing
    }
}

impl<P: PageHandle> Drop for LoadPass<P> {
    fn drop(&mut self) {
        for (_, page) in self.staged.drain(..) {
            page.release_resources();
        }
    }
}

/// What a published pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub window: VisibleRange,
    pub loaded: Vec<usize>,
    pub released: Vec<usize>,
    pub failed: Vec<usize>,
    /// A newly loaded page revealed a size the layout did not know yet.
    pub sizes_changed: bool,
}

/// Owner of every page's render handle.
#[derive(Debug)]
pub struct PageLifecycleManager<P: PageHandle> {
    slots: Vec<Option<P>>,
    native_sizes: Vec<Option<Size>>,
    fallback_size: Option<Size>,
    preload_margin: usize,
    generation: u64,
    requested: Option<VisibleRange>,
}

impl<P: PageHandle> PageLifecycleManager<P> {
    /// Create the slot arena for `document` and eagerly load its first page.
    ///
    /// A failure to load the first page is logged and leaves its slot empty;
    /// the next pass retries it.
    pub async fn initialize<D>(document: &D, preload_margin: usize) -> Result<Self, ViewerError>
    where
        D: DocumentHandle<Page = P>,
    {
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(ViewerError::EmptyDocument);
        }

        let mut manager = Self {
            slots: std::iter::repeat_with(|| None).take(page_count).collect(),
            native_sizes: vec![None; page_count],
            fallback_size: None,
            preload_margin,
            generation: 0,
            requested: None,
        };

        match document.get_page(PageNumber::new(1)).await {
            Ok(page) => {
                manager.record_size(0, page.size());
                manager.slots[0] = Some(page);
            }
            Err(err) => warn!("first page failed to load: {err}"),
        }

        debug!("lifecycle: {page_count} pages, preload margin {preload_margin}");
        Ok(manager)
    }

    pub fn page_count(&self) -> usize {
        self.slots.len()
    }

    pub fn preload_margin(&self) -> usize {
        self.preload_margin
    }

    pub fn page(&self, index: usize) -> Option<&P> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.page(index).is_some()
    }

    pub fn loaded_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| slot.as_ref().map(|_| index))
    }

    /// Native size of every page seen so far. Sizes outlive eviction.
    pub fn native_sizes(&self) -> &[Option<Size>] {
        &self.native_sizes
    }

    /// Size of the first page that ever loaded.
    pub fn fallback_size(&self) -> Option<Size> {
        self.fallback_size
    }

    /// Aspect ratio used for pages whose size is still unknown.
    pub fn fallback_aspect_ratio(&self) -> f32 {
        self.fallback_size.map(|size| size.aspect_ratio()).unwrap_or(1.0)
    }

    /// Window requested by the latest pass.
    pub fn load_window(&self) -> Option<VisibleRange> {
        self.requested
    }

    /// Start a pass for `visible`, superseding any pass still in flight.
    pub fn begin_pass(&mut self, visible: VisibleRange) -> LoadPass<P> {
        self.generation += 1;
        let window = visible.expanded(self.preload_margin, self.page_count());
        self.requested = Some(window);

        let missing: Vec<usize> = window.indices().filter(|&index| !self.is_loaded(index)).collect();
        debug!(
            "lifecycle pass {}: window {}..={}, {} to acquire",
            self.generation,
            window.start_index,
            window.end_index,
            missing.len()
        );

        LoadPass { generation: self.generation, window, missing, staged: Vec::new(), failed: Vec::new() }
    }

    /// Stage the outcome of acquiring page `index` for `pass`.
    pub fn complete_acquisition(
        &self,
        pass: &mut LoadPass<P>,
        index: usize,
        result: Result<P, ViewerError>,
    ) {
        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!("page {} failed to load: {err}", PageNumber::from_index(index));
                pass.failed.push(index);
                return;
            }
        };

        let wanted = self.requested.is_some_and(|window| window.contains(index))
            && !self.is_loaded(index)
            && !pass.staged.iter().any(|(staged, _)| *staged == index);

        if wanted {
            pass.staged.push((index, page));
        } else {
            debug!("lifecycle: discarding stale handle for page {}", PageNumber::from_index(index));
            page.release_resources();
        }
    }

    /// Publish `pass`. Returns `None` if a later pass superseded it.
    pub fn finish_pass(&mut self, mut pass: LoadPass<P>) -> Option<LoadReport> {
        if pass.generation != self.generation {
            debug!("lifecycle pass {} superseded by {}", pass.generation, self.generation);
            return None;
        }

        let window = pass.window;
        let mut report = LoadReport { window, failed: std::mem::take(&mut pass.failed), ..Default::default() };

        for (index, page) in std::mem::take(&mut pass.staged) {
            if !window.contains(index) || self.is_loaded(index) {
                page.release_resources();
                continue;
            }

            report.sizes_changed |= self.record_size(index, page.size());
            self.slots[index] = Some(page);
            report.loaded.push(index);
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if window.contains(index) {
                continue;
            }
            if let Some(page) = slot.take() {
                page.release_resources();
                report.released.push(index);
            }
        }

        debug!(
            "lifecycle pass {}: loaded {}, released {}, failed {}",
            pass.generation,
            report.loaded.len(),
            report.released.len(),
            report.failed.len()
        );
        Some(report)
    }

    /// Load the window around `visible` and evict everything outside it.
    pub async fn on_visibility_changed<D>(
        &mut self,
        document: &D,
        visible: VisibleRange,
    ) -> Option<LoadReport>
    where
        D: DocumentHandle<Page = P>,
    {
        let mut pass = self.begin_pass(visible);

        for index in pass.missing.clone() {
            let result = document.get_page(PageNumber::from_index(index)).await;
            self.complete_acquisition(&mut pass, index, result);
        }

        self.finish_pass(pass)
    }

    /// Release every loaded handle and supersede any pass in flight.
    pub fn release_all(&mut self) -> usize {
        self.generation += 1;
        self.requested = None;

        let mut released = 0;
        for page in self.slots.iter_mut().filter_map(Option::take) {
            page.release_resources();
            released += 1;
        }
        released
    }

    fn record_size(&mut self, index: usize, size: Size) -> bool {
        if self.fallback_size.is_none() {
            self.fallback_size = Some(size);
        }
        self.native_sizes[index].replace(size) != Some(size)
    }
}

impl<P: PageHandle> Drop for PageLifecycleManager<P> {
    fn drop(&mut self) {
        self.release_all();
    }
}
