//! Bounded linear undo/redo history.

use log::debug;

/// Default number of retained states.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Linear history of immutable states.
///
/// Invariant: `0 <= current_index < history.len() <= max_size`.
#[derive(Debug, Clone)]
pub struct HistoryStack<S> {
    history: Vec<S>,
    current_index: usize,
    max_size: usize,
}

impl<S> HistoryStack<S> {
    pub fn new(initial: S) -> Self {
        Self::with_max_size(initial, DEFAULT_MAX_HISTORY)
    }

    /// `max_size` is raised to 1 so the current state always survives.
    pub fn with_max_size(initial: S, max_size: usize) -> Self {
        Self { history: vec![initial], current_index: 0, max_size: max_size.max(1) }
    }

    /// The state everything renders from and mutates against.
    pub fn current(&self) -> &S {
        &self.history[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.history.len()
    }

    /// Drop the redo branch, append `state`, keep the newest `max_size`
    /// entries and point at the appended one.
    pub fn push_new_state(&mut self, state: S) {
        self.history.truncate(self.current_index + 1);
        self.history.push(state);

        if self.history.len() > self.max_size {
            let overflow = self.history.len() - self.max_size;
            self.history.drain(..overflow);
        }

        self.current_index = self.history.len() - 1;
    }

    /// Step back one state. Returns `false` at the oldest state.
    pub fn undo(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }

        self.current_index -= 1;
        debug!("undo -> history index {}", self.current_index);
        true
    }

    /// Step forward one state. Returns `false` at the newest state.
    pub fn redo(&mut self) -> bool {
        if self.current_index == self.history.len() - 1 {
            return false;
        }

        self.current_index += 1;
        debug!("redo -> history index {}", self.current_index);
        true
    }
}
