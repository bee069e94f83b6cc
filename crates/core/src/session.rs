//! Editor session: the annotation history a viewer mutates.
//!
//! The session is passed explicitly to whatever needs to read or change
//! annotations; nothing here is global.

use crate::shortcuts::{EditorCommand, KeyOutcome, ShortcutMap};
use doc_model::{
    AnnotationField, AnnotationId, AnnotationSnapshot, Color, DocumentAction, HistoryStack,
    PageNumber,
};
use log::debug;

#[derive(Debug, Clone)]
pub struct EditorSession {
    history: HistoryStack<AnnotationSnapshot>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self { history: HistoryStack::new(AnnotationSnapshot::new()) }
    }
}

impl EditorSession {
    pub fn new(history_max_size: usize) -> Self {
        Self { history: HistoryStack::with_max_size(AnnotationSnapshot::new(), history_max_size) }
    }

    /// The snapshot every page renders from.
    pub fn current_annotations(&self) -> &AnnotationSnapshot {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStack<AnnotationSnapshot> {
        &self.history
    }

    /// Apply `action` to the current snapshot and record the result as one
    /// undoable step.
    pub fn dispatch(&mut self, action: DocumentAction) -> &AnnotationSnapshot {
        let next = self.history.current().apply(action);
        debug!("session: {} annotation(s) after dispatch", next.annotation_count());
        self.history.push_new_state(next);
        self.history.current()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Change the fill of one existing annotation, keeping its identity.
    ///
    /// Returns `false` if `id` is not on `page`.
    pub fn recolor(&mut self, page: PageNumber, id: AnnotationId, fill: Color) -> bool {
        let annotations = self.current_annotations().page(page);
        if !annotations.iter().any(|annotation| annotation.id() == id) {
            return false;
        }

        let annotations = annotations
            .iter()
            .map(|annotation| {
                if annotation.id() == id {
                    annotation.with_field(AnnotationField::FillColor(fill))
                } else {
                    annotation.clone()
                }
            })
            .collect();

        self.dispatch(DocumentAction::ReplacePageAnnotations { page, annotations });
        true
    }

    /// Route a key press to undo/redo.
    ///
    /// A recognised shortcut always asks the host to suppress its default
    /// action, even when history is already at the boundary.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> KeyOutcome {
        let Some(command) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return KeyOutcome::default();
        };

        let changed = match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        };

        KeyOutcome { command: Some(command), changed, suppress_default: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Annotation, Rect};
    use std::collections::BTreeMap;

    fn page(n: u32) -> PageNumber {
        PageNumber::new(n)
    }

    fn add(session: &mut EditorSession, n: u32, x: f32) -> Annotation {
        let annotation = Annotation::rectangle(Rect::new(x, 0.0, 10.0, 10.0), Color::SELECTION_GRAY);
        let per_page = BTreeMap::from([(page(n), annotation.clone())]);
        session.dispatch(DocumentAction::AddAnnotations { per_page });
        annotation
    }

    #[test]
    fn test_dispatch_pushes_one_state() {
        let mut session = EditorSession::default();
        add(&mut session, 1, 0.0);

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.current_annotations().page(page(1)).len(), 1);
        assert!(session.can_undo());
        assert!(!session.can_redo());
    }

    #[test]
    fn test_undo_redo_restore_same_snapshot() {
        let mut session = EditorSession::default();
        add(&mut session, 1, 0.0);
        let before = session.current_annotations().clone();

        assert!(session.undo());
        assert!(session.current_annotations().is_empty());
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.current_annotations().ptr_eq(&before));
        assert!(!session.redo());
    }

    #[test]
    fn test_history_bound_comes_from_session() {
        let mut session = EditorSession::new(3);
        for i in 0..5 {
            add(&mut session, 1, i as f32);
        }

        assert_eq!(session.history().len(), 3);
        while session.undo() {}
        assert_eq!(session.current_annotations().annotation_count(), 3);
    }

    #[test]
    fn test_recolor_keeps_identity_and_order() {
        let mut session = EditorSession::default();
        let first = add(&mut session, 2, 0.0);
        let second = add(&mut session, 2, 20.0);

        assert!(session.recolor(page(2), second.id(), Color::RED));

        let annotations = session.current_annotations().page(page(2));
        assert_eq!(annotations[0], first);
        assert_eq!(annotations[1].id(), second.id());
        assert_eq!(annotations[1].created_at_ms(), second.created_at_ms());
        match &annotations[1] {
            Annotation::Rectangle(rect) => assert_eq!(rect.fill(), Color::RED),
        }

        assert!(session.undo());
        assert_eq!(session.current_annotations().page(page(2))[1], second);
    }

    #[test]
    fn test_recolor_unknown_annotation_is_a_no_op() {
        let mut session = EditorSession::default();
        let annotation = add(&mut session, 1, 0.0);

        assert!(!session.recolor(page(2), annotation.id(), Color::RED));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_shortcuts_drive_history() {
        let mut session = EditorSession::default();
        add(&mut session, 1, 0.0);

        let outcome = session.handle_key("z", true, false, false, false);
        assert_eq!(outcome.command, Some(EditorCommand::Undo));
        assert!(outcome.changed);
        assert!(outcome.suppress_default);

        let outcome = session.handle_key("Z", false, true, false, true);
        assert_eq!(outcome.command, Some(EditorCommand::Redo));
        assert!(outcome.changed);

        // Already newest: still swallowed, nothing changes.
        let outcome = session.handle_key("Z", true, true, false, false);
        assert!(!outcome.changed);
        assert!(outcome.suppress_default);

        assert_eq!(session.handle_key("z", false, false, false, false), KeyOutcome::default());
    }
}
