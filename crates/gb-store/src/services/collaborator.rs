//! Collaborators. Read-only: permissions are managed on GitHub.

use std::sync::Arc;

use gb_api::GraphqlExecutor;
use gb_api::mapper::map_collaborators;
use gb_api::operations;
use gb_core::{Collaborator, EntityId, RepositoryPermission};

use super::refresh_store;
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Read access to the collaborator store.
#[derive(Debug)]
pub struct CollaboratorService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> CollaboratorService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service reads.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Collaborator> {
        &self.stores.collaborators
    }

    /// Refetches collaborators of the viewer's repositories unless the cache
    /// is fresh.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        refresh_store(
            self.store(),
            &*self.executor,
            operations::repositories(self.first),
            map_collaborators,
            force_refresh,
        )
        .await
    }

    /// Collaborators with any access to `repository_id`, highest permission
    /// first.
    #[must_use]
    pub fn for_repository(
        &self,
        repository_id: &EntityId,
    ) -> Vec<(Collaborator, RepositoryPermission)> {
        let mut found: Vec<_> = self
            .store()
            .get_all()
            .into_iter()
            .filter_map(|collaborator| {
                let permission = collaborator
                    .grants
                    .iter()
                    .find(|grant| &grant.repository.id == repository_id)?
                    .permission;
                Some((collaborator, permission))
            })
            .collect();
        found.sort_by(|a, b| b.1.cmp(&a.1));
        found
    }
}
