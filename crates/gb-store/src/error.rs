//! Error types for the gb-store crate.

use gb_api::ApiError;
use gb_core::EntityKind;

/// Errors recorded in a store and returned to the caller.
///
/// `Clone` so the same error can sit in a store's error slot, in the
/// initializer state and in the caller's `Result` at once.
///
/// # Examples
///
/// ```
/// use gb_core::EntityKind;
/// use gb_store::StoreError;
///
/// let error = StoreError::not_found(EntityKind::Issue, "I_404");
/// assert_eq!(error.to_string(), "issue I_404 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The remote call failed or answered with errors.
    #[error("{message}")]
    Remote {
        /// Human-readable description of the failure.
        message: String,
        /// Whether repeating the call later may succeed.
        retryable: bool,
    },

    /// A mutation targeted an entity the store does not hold.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// The id, or the name, that was looked up.
        id: String,
    },

    /// `initialize` was called while the startup fetch is in flight.
    #[error("initialization is already in progress")]
    AlreadyLoading,

    /// The initializer cannot take the requested edge from its current state.
    #[error("cannot retry initialization from state '{from}'")]
    InvalidTransition {
        /// Label of the state the call was made in.
        from: &'static str,
    },
}

impl StoreError {
    /// Creates a new [`StoreError::NotFound`] error.
    #[inline]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a non-retryable [`StoreError::Remote`] error.
    #[inline]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns `true` for remote failures worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { retryable: true, .. })
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        Self::Remote {
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}
