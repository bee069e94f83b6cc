//! Document collaborator contracts.
//!
//! Decoding and page rendering live outside this crate. The viewer only
//! needs to open a document, ask for individual pages, draw them onto a
//! surface, and release their resources again.

use doc_model::{PageNumber, RenderSurface, Size};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid document format: {0}")]
    InvalidDocumentFormat(String),

    #[error("failed to load page {page_number}: {reason}")]
    PageLoad { page_number: PageNumber, reason: String },

    #[error("failed to render page {page_number}: {reason}")]
    Render { page_number: PageNumber, reason: String },

    #[error("document has no pages")]
    EmptyDocument,

    #[error("invalid viewer configuration: {0}")]
    InvalidConfig(String),
}

/// Opens documents from raw bytes.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    type Document: DocumentHandle;

    async fn load(&self, bytes: &[u8]) -> Result<Self::Document, ViewerError>;
}

/// An opened document.
#[allow(async_fn_in_trait)]
pub trait DocumentHandle {
    type Page: PageHandle;

    fn page_count(&self) -> usize;

    /// Acquire the render state of one page. May suspend.
    async fn get_page(&self, page_number: PageNumber) -> Result<Self::Page, ViewerError>;
}

/// Render state of one loaded page.
#[allow(async_fn_in_trait)]
pub trait PageHandle {
    /// Page size in native units.
    fn size(&self) -> Size;

    /// Draw the page pixels onto `surface`, scaled to its pixel width.
    async fn render(&self, surface: &mut dyn RenderSurface) -> Result<(), ViewerError>;

    /// Free the heavy per-page state. Must be idempotent.
    fn release_resources(&self);
}
