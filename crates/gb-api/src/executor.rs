//! The executor abstraction the stores talk to.
//!
//! Stores and services only see [`GraphqlExecutor`]: they hand it a document
//! and variables and get back the `{ data?, errors? }` envelope. Headers,
//! endpoints and status codes stay behind the trait.

use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::request::{GraphqlRequest, GraphqlResponse};

/// Runs GraphQL operations against some backend.
///
/// Transport failures come back as `Err`. A response that arrived but carries
/// `errors` comes back as `Ok`; callers turn it into an error with
/// [`GraphqlResponse::into_result`].
pub trait GraphqlExecutor: Send + Sync + 'static {
    /// Executes one operation.
    fn execute(
        &self,
        request: GraphqlRequest,
    ) -> impl Future<Output = Result<GraphqlResponse, ApiError>> + Send;
}

impl<E: GraphqlExecutor> GraphqlExecutor for Arc<E> {
    fn execute(
        &self,
        request: GraphqlRequest,
    ) -> impl Future<Output = Result<GraphqlResponse, ApiError>> + Send {
        (**self).execute(request)
    }
}
