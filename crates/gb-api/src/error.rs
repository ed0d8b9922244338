//! Error types for the gb-api crate.

use crate::request::GraphqlError;

/// Errors from executing a GraphQL operation.
///
/// # Examples
///
/// ```
/// use gb_api::ApiError;
///
/// let error = ApiError::RateLimited { retry_after_secs: Some(60) };
/// assert!(error.is_retryable());
/// assert!(!ApiError::Unauthorized.is_retryable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("GitHub returned HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// 401 or 403: the token is missing, expired, or lacks a scope.
    #[error("unauthorized: the GitHub token was rejected")]
    Unauthorized,

    /// 429, or a secondary rate limit.
    #[error("rate limited by GitHub{}", retry_hint(.retry_after_secs))]
    RateLimited {
        /// Seconds to wait, from the `Retry-After` header.
        retry_after_secs: Option<u64>,
    },

    /// The response carried a non-empty `errors` array.
    #[error("GraphQL error: {}", join_messages(.0))]
    Graphql(Vec<GraphqlError>),

    /// The response had neither `data` nor `errors`, or the expected field was null.
    #[error("GraphQL response is missing {0}")]
    MissingData(String),

    /// `data` did not match the expected shape.
    #[error("failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Creates a new [`ApiError::MissingData`] error.
    #[inline]
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }

    /// Returns `true` if repeating the same request later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::Unauthorized | Self::Graphql(_) | Self::MissingData(_) | Self::Decode(_) => false,
        }
    }
}

#[allow(clippy::ref_option)]
fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs.map_or_else(String::new, |secs| format!(" (retry after {secs}s)"))
}

fn join_messages(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "unknown error".to_owned();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gql(message: &str) -> GraphqlError {
        GraphqlError {
            message: message.to_owned(),
            path: Vec::new(),
            kind: None,
        }
    }

    #[test]
    fn test_graphql_display_joins_messages() {
        let error = ApiError::Graphql(vec![gql("first"), gql("second")]);
        assert_eq!(error.to_string(), "GraphQL error: first; second");
    }

    #[test]
    fn test_rate_limited_display() {
        let with = ApiError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(with.to_string().contains("retry after 30s"));
        let without = ApiError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(without.to_string(), "rate limited by GitHub");
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let error = ApiError::Http {
            status: 502,
            body: String::new(),
        };
        assert!(error.is_retryable());
        let error = ApiError::Http {
            status: 404,
            body: String::new(),
        };
        assert!(!error.is_retryable());
    }
}
