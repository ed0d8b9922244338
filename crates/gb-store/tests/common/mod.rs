//! Shared test doubles for the gb-store integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use gb_api::{ApiError, GraphqlExecutor, GraphqlRequest, GraphqlResponse};
use gb_core::Config;
use gb_store::AppContext;
use parking_lot::Mutex;
use serde_json::Value;

/// The dashboard response shared with the gb-api mapper tests.
pub const DASHBOARD: &str = include_str!("../../../gb-api/tests/fixtures/dashboard.json");

/// `data` of the dashboard fixture.
pub fn dashboard_data() -> Value {
    let envelope: Value = serde_json::from_str(DASHBOARD).unwrap();
    envelope["data"].clone()
}

/// Replays queued responses in order and records every request.
///
/// An exhausted script answers with a GraphQL error so a test that issues an
/// unexpected call fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<GraphqlResponse, ApiError>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_data(&self, data: Value) {
        self.script
            .lock()
            .push_back(Ok(GraphqlResponse::from_data(data)));
    }

    pub fn push_response(&self, response: GraphqlResponse) {
        self.script.lock().push_back(Ok(response));
    }

    pub fn push_graphql_error(&self, message: &str) {
        self.script
            .lock()
            .push_back(Ok(GraphqlResponse::from_error(message)));
    }

    pub fn push_failure(&self, error: ApiError) {
        self.script.lock().push_back(Err(error));
    }

    /// Operation names of every request seen so far.
    pub fn operations(&self) -> Vec<&'static str> {
        self.requests
            .lock()
            .iter()
            .map(GraphqlRequest::operation_name)
            .collect()
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl GraphqlExecutor for ScriptedExecutor {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        self.requests.lock().push(request);
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| Ok(GraphqlResponse::from_error("unscripted request")))
    }
}

/// A context over `executor` with default configuration.
pub fn context(executor: &Arc<ScriptedExecutor>) -> AppContext<Arc<ScriptedExecutor>> {
    AppContext::new(Arc::clone(executor), Config::default())
}

/// A context whose stores are already hydrated from the dashboard fixture.
pub async fn ready_context(executor: &Arc<ScriptedExecutor>) -> AppContext<Arc<ScriptedExecutor>> {
    let ctx = context(executor);
    executor.push_data(dashboard_data());
    ctx.initializer().initialize().await.unwrap();
    ctx
}
