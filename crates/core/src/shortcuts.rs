//! Keyboard shortcuts.

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Undo,
    Redo,
}

/// Result of handing a key press to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Command the key resolved to, if any
    pub command: Option<EditorCommand>,
    /// Whether the command changed the current snapshot
    pub changed: bool,
    /// The host must not also act on this key press
    pub suppress_default: bool,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key press. Ctrl and Meta (Cmd) are the same modifier, and
    /// keys compare case-insensitively because Shift reports `"Z"`.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Option<EditorCommand> {
        let primary = ctrl || meta;
        if !primary || alt {
            return None;
        }

        if key.eq_ignore_ascii_case("z") {
            Some(if shift { EditorCommand::Redo } else { EditorCommand::Undo })
        } else {
            None
        }
    }
}
