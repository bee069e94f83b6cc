#![allow(dead_code)]

use doc_model::{Color, NativePage, PageNumber, Rect, RenderSurface, Size};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use viewer_core::{DocumentHandle, DocumentSource, PageHandle, ViewerError};

/// Shared record of page acquisitions and releases.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    acquired: Rc<RefCell<Vec<usize>>>,
    released: Rc<RefCell<Vec<usize>>>,
}

impl Journal {
    pub fn acquired(&self) -> Vec<usize> {
        self.acquired.borrow().clone()
    }

    pub fn released_sorted(&self) -> Vec<usize> {
        let mut released = self.released.borrow().clone();
        released.sort_unstable();
        released
    }
}

#[derive(Debug)]
pub struct TestPage {
    index: usize,
    size: Size,
    journal: Journal,
}

impl PageHandle for TestPage {
    fn size(&self) -> Size {
        self.size
    }

    async fn render(&self, surface: &mut dyn RenderSurface) -> Result<(), ViewerError> {
        let width = surface.pixel_width();
        let height = width * self.size.height / self.size.width;
        surface.fill_rect(Rect::new(0.0, 0.0, width, height), Color::WHITE);
        Ok(())
    }

    fn release_resources(&self) {
        self.journal.released.borrow_mut().push(self.index);
    }
}

#[derive(Debug)]
pub struct TestDocument {
    sizes: Vec<Size>,
    journal: Journal,
    load_delay: Option<Duration>,
}

impl TestDocument {
    pub fn new(sizes: Vec<Size>) -> Self {
        Self { sizes, journal: Journal::default(), load_delay: None }
    }

    /// Make every page acquisition take `delay`.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    pub fn uniform(page_count: usize, size: Size) -> Self {
        Self::new(vec![size; page_count])
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl DocumentHandle for TestDocument {
    type Page = TestPage;

    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    async fn get_page(&self, page_number: PageNumber) -> Result<TestPage, ViewerError> {
        match self.load_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let index = page_number.index();
        let size = *self.sizes.get(index).ok_or_else(|| ViewerError::PageLoad {
            page_number,
            reason: "no such page".into(),
        })?;

        self.journal.acquired.borrow_mut().push(index);
        Ok(TestPage { index, size, journal: self.journal.clone() })
    }
}

/// Accepts `%DOC <pages>` and lays out square 800-unit pages.
pub struct TestSource;

impl DocumentSource for TestSource {
    type Document = TestDocument;

    async fn load(&self, bytes: &[u8]) -> Result<TestDocument, ViewerError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| ViewerError::InvalidDocumentFormat(err.to_string()))?;
        let pages = text
            .strip_prefix("%DOC ")
            .and_then(|count| count.trim().parse::<usize>().ok())
            .ok_or_else(|| ViewerError::InvalidDocumentFormat("missing %DOC header".into()))?;

        Ok(TestDocument::uniform(pages, Size::new(800.0, 800.0)))
    }
}

pub struct RecordingSurface {
    pub width: f32,
    pub fills: Vec<(Rect, Color)>,
}

impl RecordingSurface {
    pub fn new(width: f32) -> Self {
        Self { width, fills: Vec::new() }
    }
}

impl RenderSurface for RecordingSurface {
    fn pixel_width(&self) -> f32 {
        self.width
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fills.push((rect, color));
    }
}

pub struct RecordingPage {
    pub size: Size,
    pub drawn: Vec<(Rect, Color)>,
}

impl NativePage for RecordingPage {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.drawn.push((rect, color));
    }
}
