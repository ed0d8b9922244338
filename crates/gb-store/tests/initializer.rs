//! Startup sequencing against a scripted executor.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{ScriptedExecutor, context, dashboard_data};
use gb_api::{ApiError, GraphqlError, GraphqlExecutor, GraphqlRequest, GraphqlResponse};
use gb_core::{Config, EntityId};
use gb_store::{AppContext, InitState, StoreError, StoreEvent};
use pretty_assertions::assert_eq;
use tokio::sync::Semaphore;

fn store_sizes<E: GraphqlExecutor>(ctx: &AppContext<E>) -> [usize; 6] {
    let stores = ctx.stores();
    [
        stores.projects.len(),
        stores.repositories.len(),
        stores.users.len(),
        stores.issues.len(),
        stores.labels.len(),
        stores.collaborators.len(),
    ]
}

#[tokio::test]
async fn test_initialize_hydrates_every_store_from_one_query() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);
    assert_eq!(ctx.initializer().state(), InitState::Idle);

    executor.push_data(dashboard_data());
    ctx.initializer().initialize().await.unwrap();

    assert_eq!(ctx.initializer().state(), InitState::Ready);
    assert_eq!(executor.operations(), vec!["Dashboard"]);
    assert_eq!(executor.requests()[0].variables["first"], 50);
    assert_eq!(store_sizes(&ctx), [2, 2, 3, 2, 3, 2]);
    assert_eq!(ctx.stores().viewer_id(), Some(EntityId::from("U_1")));

    let stores = ctx.stores();
    assert!(stores.projects.is_cache_valid());
    assert!(stores.repositories.is_cache_valid());
    assert!(stores.users.is_cache_valid());
    assert!(stores.issues.is_cache_valid());
    assert!(stores.labels.is_cache_valid());
    assert!(stores.collaborators.is_cache_valid());
}

#[tokio::test]
async fn test_failed_startup_touches_no_store_then_retry_succeeds() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);

    let replaced = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&replaced);
    ctx.stores().projects.subscribe(move |event| {
        if matches!(event, StoreEvent::Replaced { .. }) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    executor.push_failure(ApiError::Http {
        status: 502,
        body: "bad gateway".to_owned(),
    });
    let err = ctx.initializer().initialize().await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(ctx.initializer().state(), InitState::Failed(err));
    assert_eq!(store_sizes(&ctx), [0; 6]);
    assert_eq!(replaced.load(Ordering::SeqCst), 0);
    assert!(!ctx.stores().projects.is_cache_valid());

    executor.push_data(dashboard_data());
    ctx.initializer().retry().await.unwrap();

    assert_eq!(ctx.initializer().state(), InitState::Ready);
    assert_eq!(store_sizes(&ctx), [2, 2, 3, 2, 3, 2]);
    assert_eq!(replaced.load(Ordering::SeqCst), 1);
    assert_eq!(executor.operations(), vec!["Dashboard", "Dashboard"]);
}

#[tokio::test]
async fn test_graphql_errors_with_partial_data_fail_the_whole_startup() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);

    executor.push_response(GraphqlResponse {
        data: Some(dashboard_data()),
        errors: vec![GraphqlError {
            message: "Resource not accessible by integration".to_owned(),
            path: Vec::new(),
            kind: Some("FORBIDDEN".to_owned()),
        }],
    });
    let err = ctx.initializer().initialize().await.unwrap_err();

    assert!(err.to_string().contains("Resource not accessible"));
    assert!(ctx.initializer().state().error().is_some());
    assert_eq!(store_sizes(&ctx), [0; 6]);
    assert!(ctx.stores().viewer_id().is_none());
}

#[tokio::test]
async fn test_initialize_when_ready_does_not_refetch() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);
    executor.push_data(dashboard_data());

    ctx.initializer().initialize().await.unwrap();
    ctx.initializer().initialize().await.unwrap();

    assert_eq!(executor.call_count(), 1);
    assert_eq!(ctx.initializer().state(), InitState::Ready);
}

#[tokio::test]
async fn test_initialize_after_failure_also_reenters_loading() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);

    executor.push_graphql_error("boom");
    assert!(ctx.initializer().initialize().await.is_err());

    executor.push_data(dashboard_data());
    ctx.initializer().initialize().await.unwrap();
    assert!(ctx.initializer().state().is_ready());
}

#[tokio::test]
async fn test_retry_is_only_valid_from_failed() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);

    assert_eq!(
        ctx.initializer().retry().await,
        Err(StoreError::InvalidTransition { from: "idle" })
    );

    executor.push_data(dashboard_data());
    ctx.initializer().initialize().await.unwrap();
    assert_eq!(
        ctx.initializer().retry().await,
        Err(StoreError::InvalidTransition { from: "ready" })
    );
    assert_eq!(executor.call_count(), 1);
}

#[tokio::test]
async fn test_state_changes_are_observable() {
    let executor = ScriptedExecutor::new();
    let ctx = context(&executor);
    let mut rx = ctx.initializer().subscribe();
    assert_eq!(*rx.borrow_and_update(), InitState::Idle);

    executor.push_data(dashboard_data());
    ctx.initializer().initialize().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), InitState::Ready);
}

/// Holds every request until a permit is released.
#[derive(Debug)]
struct Gated {
    inner: Arc<ScriptedExecutor>,
    gate: Arc<Semaphore>,
}

impl GraphqlExecutor for Gated {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        let _permit = self.gate.acquire().await.unwrap();
        self.inner.execute(request).await
    }
}

#[tokio::test]
async fn test_second_initialize_while_loading_is_rejected() {
    let inner = ScriptedExecutor::new();
    inner.push_data(dashboard_data());
    let gate = Arc::new(Semaphore::new(0));
    let ctx = AppContext::new(
        Gated {
            inner: Arc::clone(&inner),
            gate: Arc::clone(&gate),
        },
        Config::default(),
    );
    let initializer = ctx.initializer();

    let first = initializer.initialize();
    let second = async {
        tokio::task::yield_now().await;
        assert_eq!(initializer.state(), InitState::Loading);
        let result = initializer.initialize().await;
        gate.add_permits(1);
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, Ok(()));
    assert_eq!(second, Err(StoreError::AlreadyLoading));
    assert_eq!(inner.call_count(), 1);
    assert!(initializer.state().is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_startup_can_be_retried() {
    let inner = ScriptedExecutor::new();
    let gate = Arc::new(Semaphore::new(0));
    let ctx = AppContext::new(
        Gated {
            inner: Arc::clone(&inner),
            gate: Arc::clone(&gate),
        },
        Config::default(),
    );
    let initializer = ctx.initializer();

    let timed_out = tokio::time::timeout(Duration::from_secs(1), initializer.initialize()).await;
    assert!(timed_out.is_err());

    let state = initializer.state();
    assert_eq!(state.label(), "failed");
    assert!(state.error().is_some_and(StoreError::is_retryable));
    assert_eq!(store_sizes(&ctx), [0; 6]);

    inner.push_data(dashboard_data());
    gate.add_permits(1);
    initializer.retry().await.unwrap();

    assert!(initializer.state().is_ready());
    assert_eq!(store_sizes(&ctx), [2, 2, 3, 2, 3, 2]);
    assert_eq!(inner.call_count(), 1);
}
