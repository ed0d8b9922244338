//! Loading/error state.
//!
//! A plain state holder: it never fails, it only records what callers report.
//! The store pairs it with a [`LoadGuard`](crate::LoadGuard) so a tracked
//! operation always clears the busy flag exactly once.

use crate::error::StoreError;

/// Busy flag plus the last recorded error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    is_loading: bool,
    error: Option<StoreError>,
}

impl LoadState {
    /// Creates an idle state with no error.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a tracked operation is running.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the last recorded error.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Sets the busy flag. Returns `true` if it changed.
    pub fn set_loading(&mut self, loading: bool) -> bool {
        let changed = self.is_loading != loading;
        self.is_loading = loading;
        changed
    }

    /// Replaces the error. Returns `true` if it changed.
    pub fn set_error(&mut self, error: Option<StoreError>) -> bool {
        let changed = self.error != error;
        self.error = error;
        changed
    }

    /// Enters a tracked operation: busy, error cleared.
    ///
    /// Returns whether the flag and the error changed, in that order.
    pub fn begin(&mut self) -> (bool, bool) {
        (self.set_loading(true), self.set_error(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_error() {
        let mut state = LoadState::new();
        state.set_error(Some(StoreError::remote("boom")));

        assert_eq!(state.begin(), (true, true));
        assert!(state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(state.begin(), (false, false));
    }

    #[test]
    fn test_setters_report_changes() {
        let mut state = LoadState::new();
        assert!(!state.set_loading(false));
        assert!(state.set_loading(true));
        assert!(!state.set_error(None));
        assert!(state.set_error(Some(StoreError::AlreadyLoading)));
        assert!(!state.set_error(Some(StoreError::AlreadyLoading)));
    }
}
