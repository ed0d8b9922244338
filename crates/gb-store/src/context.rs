//! Composition root: every store, built once and shared by reference.

use std::sync::Arc;

use gb_api::{DashboardSnapshot, GraphqlExecutor, HttpExecutor};
use gb_core::{
    Collaborator, Config, ConfigError, EntityId, Issue, Label, Project, Repository, User,
};
use parking_lot::RwLock;
use tracing::info;

use crate::initializer::AppInitializer;
use crate::services::{
    CollaboratorService, IssueService, LabelService, ProjectService, RepositoryService,
    UserService,
};
use crate::store::EntityStore;

/// One store per feature, plus the viewer id learned from GitHub.
#[derive(Debug)]
pub struct Stores {
    /// Boards.
    pub projects: EntityStore<Project>,
    /// Repositories.
    pub repositories: EntityStore<Repository>,
    /// Users: the viewer and every collaborator.
    pub users: EntityStore<User>,
    /// Issues on boards.
    pub issues: EntityStore<Issue>,
    /// Labels.
    pub labels: EntityStore<Label>,
    /// Collaborators other than the viewer.
    pub collaborators: EntityStore<Collaborator>,
    viewer: RwLock<Option<EntityId>>,
}

impl Default for Stores {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Stores {
    /// Creates empty stores using the cache and search settings of `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let (cache, search) = (&config.cache, &config.search);
        Self {
            projects: EntityStore::new(cache, search),
            repositories: EntityStore::new(cache, search),
            users: EntityStore::new(cache, search),
            issues: EntityStore::new(cache, search),
            labels: EntityStore::new(cache, search),
            collaborators: EntityStore::new(cache, search),
            viewer: RwLock::new(None),
        }
    }

    /// The authenticated user's id, once known.
    #[must_use]
    pub fn viewer_id(&self) -> Option<EntityId> {
        self.viewer.read().clone()
    }

    pub(crate) fn set_viewer_id(&self, id: Option<EntityId>) {
        *self.viewer.write() = id;
    }

    /// Hands every store its slice of an already mapped snapshot and stamps
    /// each cache.
    ///
    /// Infallible: the snapshot is complete before any store is touched.
    pub fn hydrate(&self, snapshot: DashboardSnapshot) {
        let counts = snapshot.counts();
        let DashboardSnapshot {
            viewer_id,
            projects,
            repositories,
            users,
            issues,
            labels,
            collaborators,
        } = snapshot;

        self.set_viewer_id(viewer_id);
        self.projects.set_items(projects);
        self.repositories.set_items(repositories);
        self.users.set_items(users);
        self.issues.set_items(issues);
        self.labels.set_items(labels);
        self.collaborators.set_items(collaborators);

        self.projects.update_cache_timestamp();
        self.repositories.update_cache_timestamp();
        self.users.update_cache_timestamp();
        self.issues.update_cache_timestamp();
        self.labels.update_cache_timestamp();
        self.collaborators.update_cache_timestamp();

        info!(
            projects = counts.projects,
            repositories = counts.repositories,
            users = counts.users,
            issues = counts.issues,
            labels = counts.labels,
            collaborators = counts.collaborators,
            "stores hydrated"
        );
    }

    /// Resets every store and forgets the viewer.
    pub fn reset_all(&self) {
        self.projects.reset();
        self.repositories.reset();
        self.users.reset();
        self.issues.reset();
        self.labels.reset();
        self.collaborators.reset();
        self.set_viewer_id(None);
    }
}

/// Executor, stores and configuration wired together.
///
/// Services are cheap handles created on demand; the initializer is created
/// once so every caller observes the same startup state.
#[derive(Debug)]
pub struct AppContext<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    config: Config,
    initializer: AppInitializer<E>,
}

impl AppContext<HttpExecutor> {
    /// Builds a context that talks to GitHub over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or has no token.
    pub fn connect(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let executor = HttpExecutor::new(&config.api)?;
        Ok(Self::new(executor, config))
    }
}

impl<E: GraphqlExecutor> AppContext<E> {
    /// Wires `executor` to a fresh set of stores.
    #[must_use]
    pub fn new(executor: E, config: Config) -> Self {
        let executor = Arc::new(executor);
        let stores = Arc::new(Stores::new(&config));
        let initializer = AppInitializer::new(
            Arc::clone(&executor),
            Arc::clone(&stores),
            config.api.page_limit,
        );
        Self {
            executor,
            stores,
            config,
            initializer,
        }
    }

    /// The shared stores.
    #[must_use]
    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    /// The configuration the context was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The startup state machine.
    #[must_use]
    pub const fn initializer(&self) -> &AppInitializer<E> {
        &self.initializer
    }

    fn page_limit(&self) -> u32 {
        self.config.api.page_limit
    }

    /// Board service.
    #[must_use]
    pub fn projects(&self) -> ProjectService<E> {
        ProjectService::new(Arc::clone(&self.executor), Arc::clone(&self.stores), self.page_limit())
    }

    /// Repository service.
    #[must_use]
    pub fn repositories(&self) -> RepositoryService<E> {
        RepositoryService::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.stores),
            self.page_limit(),
        )
    }

    /// Issue service.
    #[must_use]
    pub fn issues(&self) -> IssueService<E> {
        IssueService::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.stores),
            self.page_limit(),
        )
    }

    /// Label service.
    #[must_use]
    pub fn labels(&self) -> LabelService<E> {
        LabelService::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.stores),
            self.page_limit(),
        )
    }

    /// Collaborator service.
    #[must_use]
    pub fn collaborators(&self) -> CollaboratorService<E> {
        CollaboratorService::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.stores),
            self.page_limit(),
        )
    }

    /// User service.
    #[must_use]
    pub fn users(&self) -> UserService<E> {
        UserService::new(Arc::clone(&self.executor), Arc::clone(&self.stores), self.page_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            viewer_id: Some(EntityId::from("U_1")),
            projects: vec![Project::new(EntityId::from("PVT_1"), "Roadmap")],
            users: vec![User::new(EntityId::from("U_1"), "octocat")],
            ..DashboardSnapshot::default()
        }
    }

    #[test]
    fn test_hydrate_fills_and_stamps_every_store() {
        let stores = Stores::default();
        stores.hydrate(snapshot());

        assert_eq!(stores.viewer_id(), Some(EntityId::from("U_1")));
        assert_eq!(stores.projects.len(), 1);
        assert_eq!(stores.users.len(), 1);
        assert!(stores.labels.is_empty());
        assert!(stores.projects.is_cache_valid());
        assert!(stores.labels.is_cache_valid());
        assert!(stores.collaborators.is_cache_valid());
    }

    #[test]
    fn test_reset_all() {
        let stores = Stores::default();
        stores.hydrate(snapshot());
        stores.reset_all();

        assert!(stores.viewer_id().is_none());
        assert!(stores.projects.is_empty());
        assert!(!stores.users.is_cache_valid());
    }
}
