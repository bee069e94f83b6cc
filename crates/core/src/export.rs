//! Export through an external document encoder.

use doc_model::{AnnotationSnapshot, NativePage, PageNumber};
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode document: {0}")]
    Encode(String),
}

/// Writes the original document back out with annotations burned in.
#[allow(async_fn_in_trait)]
pub trait DocumentEncoder {
    async fn encode(
        &self,
        original: &[u8],
        annotations: &AnnotationSnapshot,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Encode `original` with the annotations of `snapshot`.
///
/// Failure aborts the export as a whole; the snapshot is never touched.
pub async fn export_document<E: DocumentEncoder>(
    encoder: &E,
    original: &[u8],
    snapshot: &AnnotationSnapshot,
) -> Result<Vec<u8>, ExportError> {
    debug!(
        "exporting {} bytes with {} annotation(s)",
        original.len(),
        snapshot.annotation_count()
    );

    encoder.encode(original, snapshot).await.inspect_err(|err| warn!("export failed: {err}"))
}

/// Draw every annotation of `page_number` onto an encoder page, in z-order.
///
/// Returns the number of annotations drawn.
pub fn draw_page_annotations(
    snapshot: &AnnotationSnapshot,
    page_number: PageNumber,
    page: &mut dyn NativePage,
) -> usize {
    let annotations = snapshot.page(page_number);
    for annotation in annotations {
        annotation.draw_on_page(page);
    }
    annotations.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Annotation, Color, DocumentAction, Rect, Size};
    use std::collections::BTreeMap;

    struct RecordingPage {
        size: Size,
        drawn: Vec<(Rect, Color)>,
    }

    impl NativePage for RecordingPage {
        fn size(&self) -> Size {
            self.size
        }

        fn draw_rectangle(&mut self, rect: Rect, color: Color) {
            self.drawn.push((rect, color));
        }
    }

    /// Appends one line per annotation to the original bytes.
    struct LineEncoder;

    impl DocumentEncoder for LineEncoder {
        async fn encode(
            &self,
            original: &[u8],
            annotations: &AnnotationSnapshot,
        ) -> Result<Vec<u8>, ExportError> {
            let mut out = original.to_vec();
            for (page, items) in annotations.pages() {
                for item in items {
                    out.extend_from_slice(format!("\n{page}:{}", item.display_label()).as_bytes());
                }
            }
            Ok(out)
        }
    }

    struct BrokenEncoder;

    impl DocumentEncoder for BrokenEncoder {
        async fn encode(&self, _: &[u8], _: &AnnotationSnapshot) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Encode("disk full".into()))
        }
    }

    fn snapshot() -> AnnotationSnapshot {
        let per_page = BTreeMap::from([
            (PageNumber::new(1), Annotation::rectangle(Rect::new(10.0, 20.0, 30.0, 40.0), Color::RED)),
            (PageNumber::new(3), Annotation::rectangle(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK)),
        ]);
        AnnotationSnapshot::new().apply(DocumentAction::AddAnnotations { per_page })
    }

    #[tokio::test]
    async fn test_export_hands_snapshot_to_encoder() {
        let bytes = export_document(&LineEncoder, b"%DOC", &snapshot()).await.unwrap();
        assert_eq!(bytes, b"%DOC\n1:Rectangle\n3:Rectangle".to_vec());
    }

    #[tokio::test]
    async fn test_export_failure_is_reported() {
        let snapshot = snapshot();
        let result = export_document(&BrokenEncoder, b"%DOC", &snapshot).await;

        assert!(matches!(result, Err(ExportError::Encode(reason)) if reason == "disk full"));
        assert_eq!(snapshot.annotation_count(), 2);
    }

    #[test]
    fn test_draw_page_annotations_flips_into_page_space() {
        let mut page = RecordingPage { size: Size::new(200.0, 300.0), drawn: Vec::new() };

        assert_eq!(draw_page_annotations(&snapshot(), PageNumber::new(1), &mut page), 1);
        assert_eq!(page.drawn, vec![(Rect::new(10.0, 240.0, 30.0, 40.0), Color::RED)]);

        assert_eq!(draw_page_annotations(&snapshot(), PageNumber::new(2), &mut page), 0);
    }
}
