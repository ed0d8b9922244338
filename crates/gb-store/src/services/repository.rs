//! Repositories.

use std::sync::Arc;

use gb_api::GraphqlExecutor;
use gb_api::mapper::{map_repositories, map_repository};
use gb_api::operations::{self, Visibility};
use gb_api::schema::{IdNode, RepositoryNode};
use gb_core::{EntityId, Repository, RepositoryPatch};
use tracing::info;

use super::{apply_confirmed, ensure_present, mutate, refresh_store, require};
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Input for [`RepositoryService::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRepository {
    /// Repository name, without the owner.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Public or private.
    pub visibility: Visibility,
}

/// Remote operations on the repository store.
///
/// GitHub's GraphQL API cannot delete repositories; archiving takes that
/// place.
#[derive(Debug)]
pub struct RepositoryService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> RepositoryService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Repository> {
        &self.stores.repositories
    }

    /// Refetches the viewer's repositories unless the cache is fresh.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        refresh_store(
            self.store(),
            &*self.executor,
            operations::repositories(self.first),
            map_repositories,
            force_refresh,
        )
        .await
    }

    /// Creates a repository and appends the server's copy.
    pub async fn create(&self, new: NewRepository) -> Result<Repository, StoreError> {
        let store = self.store();
        store
            .track(async {
                let node: RepositoryNode = mutate(
                    &*self.executor,
                    operations::create_repository(
                        self.first,
                        &new.name,
                        new.description.as_deref(),
                        new.visibility,
                    ),
                    &["createRepository", "repository"],
                )
                .await?;
                let repository = map_repository(&node);
                store.insert(repository.clone());
                info!(
                    id = %repository.id,
                    name = %repository.name_with_owner,
                    "repository created"
                );
                Ok(repository)
            })
            .await
    }

    /// Renames, re-describes, archives or unarchives a repository.
    ///
    /// Name and description go out in one mutation and the archive flag in
    /// another. Each part is applied locally as soon as its own mutation
    /// succeeds, so a failure in the second leaves the first in place,
    /// matching what GitHub now holds.
    pub async fn update(
        &self,
        id: &EntityId,
        patch: &RepositoryPatch,
    ) -> Result<Repository, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let mut current = None;

                if patch.name.is_some() || patch.description.is_some() {
                    let _: IdNode = mutate(
                        &*self.executor,
                        operations::update_repository(
                            self.first,
                            id,
                            patch.name.as_deref(),
                            patch.description.as_deref(),
                        ),
                        &["updateRepository", "repository"],
                    )
                    .await?;
                    let edit = RepositoryPatch {
                        is_archived: None,
                        ..patch.clone()
                    };
                    current = Some(apply_confirmed(store, id, &edit)?);
                }

                if let Some(archived) = patch.is_archived {
                    let key = if archived {
                        "archiveRepository"
                    } else {
                        "unarchiveRepository"
                    };
                    let _: IdNode = mutate(
                        &*self.executor,
                        operations::set_repository_archived(self.first, id, archived),
                        &[key, "repository"],
                    )
                    .await?;
                    let flag = RepositoryPatch {
                        is_archived: Some(archived),
                        ..RepositoryPatch::default()
                    };
                    current = Some(apply_confirmed(store, id, &flag)?);
                    info!(%id, archived, "repository archive flag changed");
                }

                match current {
                    Some(repository) => Ok(repository),
                    None => require(store, id),
                }
            })
            .await
    }

    /// Archives a repository.
    pub async fn archive(&self, id: &EntityId) -> Result<Repository, StoreError> {
        let patch = RepositoryPatch {
            is_archived: Some(true),
            ..RepositoryPatch::default()
        };
        self.update(id, &patch).await
    }

    /// Reverses [`archive`](Self::archive).
    pub async fn unarchive(&self, id: &EntityId) -> Result<Repository, StoreError> {
        let patch = RepositoryPatch {
            is_archived: Some(false),
            ..RepositoryPatch::default()
        };
        self.update(id, &patch).await
    }
}
