//! Annotation data model
//!
//! Annotations are immutable values. Every box is stored in page-native units
//! with a top-left origin; conversion to the bottom-left origin used by page
//! encoders happens in [`Annotation::draw_on_page`].

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for an annotation.
///
/// Survives `with_field` copies, so an edited annotation keeps its identity
/// across history snapshots.
pub type AnnotationId = uuid::Uuid;

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` (the leading `#` is optional). The result is opaque.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidFormat(hex.to_owned()));
        }

        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidFormat(hex.to_owned()))?;

        Ok(Self::rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Lowercase `#rrggbb`; alpha is not encoded.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    /// Neutral fill used for freshly drawn rectangles.
    pub const SELECTION_GRAY: Color = Color { r: 0xcc, g: 0xcc, b: 0xcc, a: 255 };
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color format: {0}")]
    InvalidFormat(String),
}

/// On-screen drawing target for a single page (a canvas, a texture, ...).
pub trait RenderSurface {
    /// Width of the surface in device pixels.
    fn pixel_width(&self) -> f32;

    /// Fill `rect`, given in surface pixels with a top-left origin.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// A page of the output document, as exposed by a document encoder.
pub trait NativePage {
    /// Page size in native units.
    fn size(&self) -> Size;

    /// Fill `rect`, given in native units with a bottom-left origin.
    fn draw_rectangle(&mut self, rect: Rect, color: Color);
}

/// Filled rectangle in page-native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleAnnotation {
    id: AnnotationId,
    created_at_ms: i64,
    bounds: Rect,
    fill: Color,
}

impl RectangleAnnotation {
    pub fn fill(&self) -> Color {
        self.fill
    }
}

/// Field replacement accepted by [`Annotation::with_field`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnotationField {
    FillColor(Color),
}

/// Immutable annotation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Rectangle(RectangleAnnotation),
}

impl Annotation {
    /// Create a filled rectangle stamped with the current time.
    pub fn rectangle(bounds: Rect, fill: Color) -> Self {
        debug_assert!(bounds.is_valid(), "negative-sized annotation box: {bounds:?}");

        Annotation::Rectangle(RectangleAnnotation {
            id: AnnotationId::new_v4(),
            created_at_ms: now_ms(),
            bounds,
            fill,
        })
    }

    pub fn id(&self) -> AnnotationId {
        match self {
            Annotation::Rectangle(rect) => rect.id,
        }
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn created_at_ms(&self) -> i64 {
        match self {
            Annotation::Rectangle(rect) => rect.created_at_ms,
        }
    }

    /// Bounds in page-native units, top-left origin.
    pub fn bounds(&self) -> Rect {
        match self {
            Annotation::Rectangle(rect) => rect.bounds,
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Annotation::Rectangle(_) => "Rectangle",
        }
    }

    /// Copy with one field replaced. Identity and creation time are kept.
    pub fn with_field(&self, field: AnnotationField) -> Annotation {
        match (self, field) {
            (Annotation::Rectangle(rect), AnnotationField::FillColor(fill)) => {
                Annotation::Rectangle(RectangleAnnotation { fill, ..rect.clone() })
            }
        }
    }

    /// Draw onto a surface that shows the whole page width.
    pub fn draw_on_surface(&self, surface: &mut dyn RenderSurface, page_native_width: f32) {
        let to_surface = surface.pixel_width() / page_native_width;

        match self {
            Annotation::Rectangle(rect) => {
                surface.fill_rect(rect.bounds.scaled(to_surface), rect.fill);
            }
        }
    }

    /// Draw onto an encoder page, flipping into its bottom-left origin.
    pub fn draw_on_page(&self, page: &mut dyn NativePage) {
        let page_height = page.size().height;

        match self {
            Annotation::Rectangle(rect) => {
                let Rect { x, y, width, height } = rect.bounds;
                page.draw_rectangle(Rect::new(x, page_height - y - height, width, height), rect.fill);
            }
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
