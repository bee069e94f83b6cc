//! Pagemark Core Library
//!
//! Editor-level pieces of the annotation viewer: configuration, the undoable
//! editor session, keyboard shortcuts, export, and the interactive viewer
//! that ties the viewer core to a document.

pub mod config;
pub mod export;
pub mod session;
pub mod shortcuts;
pub mod viewer;

pub use config::{ConfigError, ViewerConfig};
pub use export::{draw_page_annotations, export_document, DocumentEncoder, ExportError};
pub use session::EditorSession;
pub use shortcuts::{EditorCommand, KeyOutcome, ShortcutMap};
pub use viewer::{InteractiveViewer, PageView};
