//! Boards.

use std::sync::Arc;

use gb_api::mapper::{map_project, map_projects, repository_summary};
use gb_api::operations;
use gb_api::schema::{IdNode, ProjectNode, RepositoryRefNode};
use gb_api::GraphqlExecutor;
use gb_core::{EntityId, Project, ProjectPatch};
use tracing::info;

use super::{apply_confirmed, ensure_present, mutate, refresh_store, remove_confirmed, require};
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Input for [`ProjectService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// User or organization that will own the board.
    pub owner_id: EntityId,
    /// Board title.
    pub title: String,
}

/// Remote operations on the project store.
#[derive(Debug)]
pub struct ProjectService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> ProjectService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Project> {
        &self.stores.projects
    }

    /// Refetches every board unless the cache is fresh.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        refresh_store(
            self.store(),
            &*self.executor,
            operations::projects(self.first),
            map_projects,
            force_refresh,
        )
        .await
    }

    /// Creates a board and appends the server's copy.
    pub async fn create(&self, new: NewProject) -> Result<Project, StoreError> {
        let store = self.store();
        store
            .track(async {
                let node: ProjectNode = mutate(
                    &*self.executor,
                    operations::create_project(self.first, &new.owner_id, &new.title),
                    &["createProjectV2", "projectV2"],
                )
                .await?;
                let project = map_project(&node);
                store.insert(project.clone());
                info!(id = %project.id, title = %project.title, "project created");
                Ok(project)
            })
            .await
    }

    /// Updates title, description, visibility or closed state.
    ///
    /// `patch.repositories` is not sent and not applied; linking goes through
    /// [`link_repository`](Self::link_repository).
    pub async fn update(&self, id: &EntityId, patch: &ProjectPatch) -> Result<Project, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let _: IdNode = mutate(
                    &*self.executor,
                    operations::update_project(
                        self.first,
                        id,
                        patch.title.as_deref(),
                        patch.short_description.as_deref(),
                        patch.closed,
                        patch.public,
                    ),
                    &["updateProjectV2", "projectV2"],
                )
                .await?;
                let local = ProjectPatch {
                    repositories: None,
                    ..patch.clone()
                };
                apply_confirmed(store, id, &local)
            })
            .await
    }

    /// Deletes a board.
    pub async fn delete(&self, id: &EntityId) -> Result<(), StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let _: IdNode = mutate(
                    &*self.executor,
                    operations::delete_project(id),
                    &["deleteProjectV2", "projectV2"],
                )
                .await?;
                remove_confirmed(store, id)?;
                info!(%id, "project deleted");
                Ok(())
            })
            .await
    }

    /// Links a repository to a board and records it on the local copy.
    pub async fn link_repository(
        &self,
        project_id: &EntityId,
        repository_id: &EntityId,
    ) -> Result<Project, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, project_id)?;
                let node: RepositoryRefNode = mutate(
                    &*self.executor,
                    operations::link_project_repository(project_id, repository_id),
                    &["linkProjectV2ToRepository", "repository"],
                )
                .await?;
                let linked = repository_summary(&node);

                let mut repositories = require(store, project_id)?.repositories;
                if !repositories.iter().any(|repo| repo.id == linked.id) {
                    repositories.push(linked);
                }
                let patch = ProjectPatch {
                    repositories: Some(repositories),
                    ..ProjectPatch::default()
                };
                apply_confirmed(store, project_id, &patch)
            })
            .await
    }
}
