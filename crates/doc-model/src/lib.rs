//! Document model for page annotations.
//!
//! Immutable annotation values, the snapshot store they live in, and the
//! bounded undo/redo history layered over that store.

pub mod annotation;
pub mod geometry;
pub mod history;
pub mod store;

pub use annotation::{
    Annotation, AnnotationField, AnnotationId, Color, ColorParseError, NativePage,
    RectangleAnnotation, RenderSurface,
};
pub use geometry::{Coord, Rect, Size};
pub use history::{HistoryStack, DEFAULT_MAX_HISTORY};
pub use store::{AnnotationSnapshot, DocumentAction, PageNumber};
