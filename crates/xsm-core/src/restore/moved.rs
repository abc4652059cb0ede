use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::window::WindowId;

/// Window handles already moved during one restore run.
///
/// Shared by every move task of the run so no window is ever sent two move
/// commands, even when several records resolve to the same window.
#[derive(Debug, Default)]
pub struct MovedWindows {
    inner: Mutex<HashSet<WindowId>>,
}

impl MovedWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `window_id` as moved. Returns false if it already was, in
    /// which case the caller must not move it again.
    pub fn claim(&self, window_id: WindowId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(window_id)
    }

    /// Forget `window_id` after its move command failed, so a later attempt
    /// may try again.
    pub fn release(&self, window_id: WindowId) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&window_id);
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&window_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
