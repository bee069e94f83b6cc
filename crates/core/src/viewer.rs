//! Interactive viewer.
//!
//! Glues the page layout, visible-range tracking, page lifecycle, drag
//! selection and scroll debounce together for one open document. Pointer
//! events arrive in screen space; annotation changes go to the
//! [`EditorSession`] handed in by the host.

use crate::config::ViewerConfig;
use crate::session::EditorSession;
use doc_model::{AnnotationSnapshot, Color, Coord, PageNumber, Rect, RenderSurface, Size};
use log::{debug, warn};
use pagemark_scheduler::Debouncer;
use std::time::Duration;
use viewer_core::{
    screen_to_content, DocumentHandle, DocumentSource, LoadReport, PageHandle, PageLayout,
    PageLifecycleManager, ScrollWindow, SelectionEngine, SelectionOverlay, Tool, ViewerError,
    ViewportGeometry, VisibilityTracker, VisibleRange,
};

/// How a page was drawn by [`InteractiveViewer::render_page`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageView {
    /// Page pixels followed by its annotations and any live preview.
    Rendered { annotations: usize, preview: bool },
    /// The page is not loaded; the host shows an empty box of this size.
    Placeholder { content_box: Rect },
}

pub struct InteractiveViewer<D: DocumentHandle> {
    config: ViewerConfig,
    document: D,
    lifecycle: PageLifecycleManager<D::Page>,
    layout: PageLayout,
    viewport: ViewportGeometry,
    tracker: VisibilityTracker,
    selection: SelectionEngine,
    scroll_settled: Debouncer<VisibleRange>,
}

impl<D: DocumentHandle> InteractiveViewer<D> {
    /// Decode `bytes` with `source` and open the result.
    pub async fn open<S>(
        source: &S,
        bytes: &[u8],
        viewport: ViewportGeometry,
        config: ViewerConfig,
    ) -> Result<Self, ViewerError>
    where
        S: DocumentSource<Document = D>,
    {
        let document = source.load(bytes).await?;
        Self::new(document, viewport, config).await
    }

    /// Show `document` scrolled to the top and load the pages around the
    /// first screen.
    ///
    /// # Errors
    /// Fails with [`ViewerError::InvalidConfig`] if `config` does not
    /// validate, before the document is touched.
    pub async fn new(
        document: D,
        viewport: ViewportGeometry,
        config: ViewerConfig,
    ) -> Result<Self, ViewerError> {
        config
            .validate()
            .map_err(|err| ViewerError::InvalidConfig(err.to_string()))?;

        let lifecycle = PageLifecycleManager::initialize(&document, config.preload_margin).await?;
        let layout = layout_for(&config, &lifecycle);
        let viewport = viewport.scrolled_to(0.0);
        let tracker = VisibilityTracker::new(ScrollWindow::from(&viewport), &layout);

        let mut viewer = Self {
            selection: SelectionEngine::new(Tool::default(), config.fill_color),
            scroll_settled: Debouncer::new(config.scroll_debounce),
            config,
            document,
            lifecycle,
            layout,
            viewport,
            tracker,
        };

        let visible = viewer.tracker.range();
        viewer.load_pages(visible).await;
        Ok(viewer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.lifecycle.page_count()
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn lifecycle(&self) -> &PageLifecycleManager<D::Page> {
        &self.lifecycle
    }

    pub fn viewport(&self) -> ViewportGeometry {
        self.viewport
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.tracker.range()
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn selection_overlay(&self) -> Option<SelectionOverlay> {
        self.selection.overlay()
    }

    pub fn tool(&self) -> Tool {
        self.selection.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.selection.set_tool(tool);
    }

    pub fn set_fill_color(&mut self, fill: Color) {
        self.selection.set_fill(fill);
    }

    /// React to a scroll. Returns the new visible range if it changed, in
    /// which case a page load is scheduled after the debounce delay.
    pub fn on_scroll(&mut self, scroll_top: f32) -> Option<VisibleRange> {
        self.viewport = self.viewport.scrolled_to(scroll_top);
        self.refresh_visibility()
    }

    /// Jump so that page `index` starts at the viewport top.
    pub fn scroll_to_page(&mut self, index: usize) -> Option<VisibleRange> {
        self.on_scroll(self.layout.scroll_offset_for_page(index))
    }

    pub fn on_resize(&mut self, origin: Coord, size: Size) -> Option<VisibleRange> {
        self.viewport = ViewportGeometry::new(origin, size, self.viewport.scroll_top);
        self.refresh_visibility()
    }

    pub fn has_pending_load(&self) -> bool {
        self.scroll_settled.is_pending()
    }

    /// Wait for scrolling to settle, then load and release pages.
    ///
    /// Never resolves while no load is pending. Cancel-safe: if the future
    /// is dropped at any point, including while pages are being acquired,
    /// the load stays scheduled.
    pub async fn settle(&mut self) -> Option<LoadReport> {
        let visible = self.scroll_settled.expired().await;
        self.run_scheduled_load(visible).await
    }

    /// Run a scheduled load now instead of waiting for the debounce delay.
    pub async fn flush_pending_load(&mut self) -> Option<LoadReport> {
        let visible = self.scroll_settled.cancel_pending()?;
        self.run_scheduled_load(visible).await
    }

    pub fn pointer_down(&mut self, screen: Coord) {
        let point = screen_to_content(screen, &self.viewport);
        self.selection.press(point, self.tracker.range(), &self.layout);
    }

    pub fn pointer_move(&mut self, screen: Coord) {
        let point = screen_to_content(screen, &self.viewport);
        self.selection.pointer_move(point, self.tracker.range(), &self.layout);
    }

    /// Finish a drag. Returns `true` if annotations were added to `session`.
    pub fn pointer_up(&mut self, screen: Coord, session: &mut EditorSession) -> bool {
        let point = screen_to_content(screen, &self.viewport);
        match self.selection.release(point, self.tracker.range(), &self.layout) {
            Some(action) => {
                session.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Draw page `index`: its pixels, then its annotations in z-order, then
    /// the live preview of a drag in progress.
    pub async fn render_page(
        &self,
        index: usize,
        surface: &mut dyn RenderSurface,
        annotations: &AnnotationSnapshot,
    ) -> Result<PageView, ViewerError> {
        let page_number = PageNumber::from_index(index);
        let (Some(content_box), Some(native_width)) =
            (self.layout.content_box(index), self.layout.native_width(index))
        else {
            return Err(ViewerError::Render {
                page_number,
                reason: format!("document has {} pages", self.page_count()),
            });
        };

        let Some(page) = self.lifecycle.page(index) else {
            return Ok(PageView::Placeholder { content_box });
        };

        if let Err(err) = page.render(surface).await {
            warn!("page {page_number} failed to render: {err}");
            return Err(err);
        }

        let committed = annotations.page(page_number);
        for annotation in committed {
            annotation.draw_on_surface(surface, native_width);
        }

        let preview = self.selection.preview(page_number);
        if let Some(annotation) = preview {
            annotation.draw_on_surface(surface, native_width);
        }

        Ok(PageView::Rendered { annotations: committed.len(), preview: preview.is_some() })
    }

    /// Swap in another document.
    ///
    /// Every handle of the previous document is released once the new one
    /// has initialized. On failure the current document stays open.
    pub async fn replace_document(&mut self, document: D) -> Result<(), ViewerError> {
        let lifecycle = PageLifecycleManager::initialize(&document, self.config.preload_margin).await?;

        let released = self.lifecycle.release_all();
        debug!("replacing document, released {released} page(s)");

        self.document = document;
        self.lifecycle = lifecycle;
        self.scroll_settled.cancel_pending();
        self.selection.cancel();
        self.viewport = self.viewport.scrolled_to(0.0);
        self.layout = layout_for(&self.config, &self.lifecycle);
        self.tracker = VisibilityTracker::new(ScrollWindow::from(&self.viewport), &self.layout);

        let visible = self.tracker.range();
        self.load_pages(visible).await;
        Ok(())
    }

    fn refresh_visibility(&mut self) -> Option<VisibleRange> {
        let changed = self.tracker.update(ScrollWindow::from(&self.viewport), &self.layout)?;
        self.scroll_settled.schedule(changed);
        Some(changed)
    }

    async fn run_scheduled_load(&mut self, visible: VisibleRange) -> Option<LoadReport> {
        // Re-arm at once so a cancelled pass is retried by the next settle.
        let retry = self.scroll_settled.schedule_after(Duration::ZERO, visible);
        let report = self.load_pages(visible).await;
        // A relayout during the pass may have scheduled a newer range.
        self.scroll_settled.cancel(retry);
        report
    }

    async fn load_pages(&mut self, visible: VisibleRange) -> Option<LoadReport> {
        let report = self.lifecycle.on_visibility_changed(&self.document, visible).await?;

        if report.sizes_changed {
            self.layout = layout_for(&self.config, &self.lifecycle);
            // Pages may have moved under the viewport.
            self.refresh_visibility();
        }

        Some(report)
    }
}

fn layout_for<P: PageHandle>(config: &ViewerConfig, lifecycle: &PageLifecycleManager<P>) -> PageLayout {
    PageLayout::compute(
        config.page_width,
        config.page_gap,
        lifecycle.native_sizes(),
        lifecycle.fallback_size(),
    )
}
