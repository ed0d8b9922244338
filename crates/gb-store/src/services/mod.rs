//! Feature services: the remote half of each store.
//!
//! A service pairs one store (plus whichever sibling stores it reads) with
//! the executor. Refreshes go through
//! [`EntityStore::execute_with_cache`]; mutations run inside
//! [`EntityStore::track`] so failures land in the store's error slot as well
//! as in the caller's `Result`.
//!
//! Every mutation talks to GitHub first and touches local state only after
//! the remote call succeeded.

mod collaborator;
mod issue;
mod label;
mod project;
mod repository;
mod user;

pub use collaborator::CollaboratorService;
pub use issue::{IssueService, NewIssue};
pub use label::{LabelService, NewLabel};
pub use project::{NewProject, ProjectService};
pub use repository::{NewRepository, RepositoryService};
pub use user::UserService;

use gb_api::schema::ViewerData;
use gb_api::{GraphqlExecutor, GraphqlRequest};
use gb_core::{Entity, EntityId};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Runs a viewer query and decodes the whole envelope.
pub(crate) async fn fetch_viewer<E: GraphqlExecutor>(
    executor: &E,
    request: GraphqlRequest,
) -> Result<ViewerData, StoreError> {
    let operation = request.operation_name();
    let response = executor.execute(request).await?;
    let data: ViewerData = response.into_result()?;
    debug!(operation, "viewer data received");
    Ok(data)
}

/// Runs a mutation and decodes the payload found at `path`.
pub(crate) async fn mutate<E: GraphqlExecutor, P: DeserializeOwned>(
    executor: &E,
    request: GraphqlRequest,
    path: &[&str],
) -> Result<P, StoreError> {
    let operation = request.operation_name();
    let response = executor.execute(request).await?;
    let payload = response.into_payload(path)?;
    debug!(operation, "mutation confirmed");
    Ok(payload)
}

/// Refetches one store unless its cache is fresh.
pub(crate) async fn refresh_store<E, T>(
    store: &EntityStore<T>,
    executor: &E,
    request: GraphqlRequest,
    map: fn(&ViewerData) -> Vec<T>,
    force_refresh: bool,
) -> Result<Fetch<()>, StoreError>
where
    E: GraphqlExecutor,
    T: Entity,
{
    store
        .execute_with_cache(force_refresh, || async move {
            let data = fetch_viewer(executor, request).await?;
            store.set_items(map(&data));
            Ok(())
        })
        .await
}

/// Fails with `NotFound` unless `store` holds `id`.
pub(crate) fn ensure_present<T: Entity>(
    store: &EntityStore<T>,
    id: &EntityId,
) -> Result<(), StoreError> {
    if store.contains(id) {
        Ok(())
    } else {
        Err(StoreError::not_found(T::KIND, id.as_str()))
    }
}

/// Looks up `id`, failing with `NotFound` on a miss.
pub(crate) fn require<T: Entity>(store: &EntityStore<T>, id: &EntityId) -> Result<T, StoreError> {
    store
        .get_by_id(id)
        .ok_or_else(|| StoreError::not_found(T::KIND, id.as_str()))
}

/// Applies a patch after remote success. The entity can vanish while the
/// remote call is in flight; that is reported as `NotFound`.
pub(crate) fn apply_confirmed<T: Entity>(
    store: &EntityStore<T>,
    id: &EntityId,
    patch: &T::Patch,
) -> Result<T, StoreError> {
    store
        .update(id, patch)
        .ok_or_else(|| StoreError::not_found(T::KIND, id.as_str()))
}

/// Removes an entity after remote success.
pub(crate) fn remove_confirmed<T: Entity>(
    store: &EntityStore<T>,
    id: &EntityId,
) -> Result<(), StoreError> {
    if store.delete(id) {
        Ok(())
    } else {
        Err(StoreError::not_found(T::KIND, id.as_str()))
    }
}
