//! Issues and their placement on boards.

use std::sync::Arc;

use gb_api::GraphqlExecutor;
use gb_api::mapper::{map_issue, map_issues};
use gb_api::operations::{self, IssueUpdate};
use gb_api::schema::{IdNode, IssueNode, IssueStateNode};
use gb_core::{EntityId, EntityKind, Issue, IssuePatch, IssueState, ProjectItemRef};
use tracing::info;

use super::{apply_confirmed, ensure_present, mutate, refresh_store, remove_confirmed, require};
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Input for [`IssueService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Repository the issue is opened in.
    pub repository_id: EntityId,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: Option<String>,
    /// Labels to apply.
    pub label_ids: Vec<EntityId>,
    /// Users to assign.
    pub assignee_ids: Vec<EntityId>,
}

impl NewIssue {
    /// An issue with only a title, no body, labels or assignees.
    #[must_use]
    pub fn new(repository_id: EntityId, title: impl Into<String>) -> Self {
        Self {
            repository_id,
            title: title.into(),
            body: None,
            label_ids: Vec::new(),
            assignee_ids: Vec::new(),
        }
    }
}

/// Remote operations on the issue store.
///
/// Reads the project store for board columns and the user store to turn
/// assignee logins into ids.
#[derive(Debug)]
pub struct IssueService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> IssueService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Issue> {
        &self.stores.issues
    }

    /// Refetches the issues on every board unless the cache is fresh.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        refresh_store(
            self.store(),
            &*self.executor,
            operations::projects(self.first),
            map_issues,
            force_refresh,
        )
        .await
    }

    /// Opens an issue and appends the server's copy. The new issue is on no
    /// board until [`add_to_project`](Self::add_to_project).
    pub async fn create(&self, new: NewIssue) -> Result<Issue, StoreError> {
        let store = self.store();
        store
            .track(async {
                let node: IssueNode = mutate(
                    &*self.executor,
                    operations::create_issue(
                        &new.repository_id,
                        &new.title,
                        new.body.as_deref(),
                        &new.label_ids,
                        &new.assignee_ids,
                    ),
                    &["createIssue", "issue"],
                )
                .await?;
                let issue = map_issue(&node);
                store.insert(issue.clone());
                info!(id = %issue.id, number = issue.number, "issue created");
                Ok(issue)
            })
            .await
    }

    /// Adds an issue to a board, with no column yet.
    pub async fn add_to_project(
        &self,
        issue_id: &EntityId,
        project_id: &EntityId,
    ) -> Result<Issue, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, issue_id)?;
                ensure_present(&self.stores.projects, project_id)?;
                let item: IdNode = mutate(
                    &*self.executor,
                    operations::add_project_item(project_id, issue_id),
                    &["addProjectV2ItemById", "item"],
                )
                .await?;
                let patch = IssuePatch {
                    placement: Some(ProjectItemRef {
                        project_id: project_id.clone(),
                        item_id: item.id,
                        column: None,
                    }),
                    ..IssuePatch::default()
                };
                apply_confirmed(store, issue_id, &patch)
            })
            .await
    }

    /// Edits title, body, state, labels or assignees.
    ///
    /// Assignees are given as logins and must be known to the user store.
    /// `patch.placement` is ignored; use
    /// [`move_to_column`](Self::move_to_column).
    pub async fn update(&self, id: &EntityId, patch: &IssuePatch) -> Result<Issue, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let label_ids: Option<Vec<EntityId>> = patch
                    .labels
                    .as_ref()
                    .map(|labels| labels.iter().map(|label| label.id.clone()).collect());
                let assignee_ids = patch
                    .assignees
                    .as_ref()
                    .map(|logins| self.resolve_logins(logins))
                    .transpose()?;

                let _: IdNode = mutate(
                    &*self.executor,
                    operations::update_issue(
                        id,
                        IssueUpdate {
                            title: patch.title.as_deref(),
                            body: patch.body.as_deref(),
                            state: patch.state,
                            label_ids: label_ids.as_deref(),
                            assignee_ids: assignee_ids.as_deref(),
                        },
                    ),
                    &["updateIssue", "issue"],
                )
                .await?;

                let local = IssuePatch {
                    placement: None,
                    ..patch.clone()
                };
                apply_confirmed(store, id, &local)
            })
            .await
    }

    /// Closes an issue.
    pub async fn close(&self, id: &EntityId) -> Result<Issue, StoreError> {
        self.set_state(id, IssueState::Closed).await
    }

    /// Reopens an issue.
    pub async fn reopen(&self, id: &EntityId) -> Result<Issue, StoreError> {
        self.set_state(id, IssueState::Open).await
    }

    async fn set_state(&self, id: &EntityId, state: IssueState) -> Result<Issue, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let key = match state {
                    IssueState::Open => "reopenIssue",
                    IssueState::Closed => "closeIssue",
                };
                let node: IssueStateNode = mutate(
                    &*self.executor,
                    operations::set_issue_state(id, state),
                    &[key, "issue"],
                )
                .await?;
                let patch = IssuePatch {
                    state: Some(node.state),
                    ..IssuePatch::default()
                };
                let issue = apply_confirmed(store, id, &patch)?;
                info!(%id, state = %issue.state, "issue state changed");
                Ok(issue)
            })
            .await
    }

    /// Moves an issue to the column named `column` on a board.
    ///
    /// The board must have a "Status" field with that option, and the issue
    /// must already be on the board.
    pub async fn move_to_column(
        &self,
        issue_id: &EntityId,
        project_id: &EntityId,
        column: &str,
    ) -> Result<Issue, StoreError> {
        let store = self.store();
        store
            .track(async {
                let issue = require(store, issue_id)?;
                let project = require(&self.stores.projects, project_id)?;
                let field_id = project.status_field_id.as_deref().ok_or_else(|| {
                    StoreError::not_found(EntityKind::Project, format!("{project_id} Status field"))
                })?;
                let option = project.column_named(column).ok_or_else(|| {
                    let what = format!("{project_id} column {column}");
                    StoreError::not_found(EntityKind::Project, what)
                })?;
                let item = issue.item_on(project_id).ok_or_else(|| {
                    StoreError::not_found(EntityKind::Issue, format!("{issue_id} on {project_id}"))
                })?;

                let _: IdNode = mutate(
                    &*self.executor,
                    operations::move_project_item(project_id, &item.item_id, field_id, &option.id),
                    &["updateProjectV2ItemFieldValue", "projectV2Item"],
                )
                .await?;

                let patch = IssuePatch {
                    placement: Some(ProjectItemRef {
                        project_id: project_id.clone(),
                        item_id: item.item_id.clone(),
                        column: Some(option.name.clone()),
                    }),
                    ..IssuePatch::default()
                };
                let moved = apply_confirmed(store, issue_id, &patch)?;
                info!(%issue_id, %project_id, column = %option.name, "issue moved");
                Ok(moved)
            })
            .await
    }

    /// Deletes an issue.
    pub async fn delete(&self, id: &EntityId) -> Result<(), StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let _: IdNode = mutate(
                    &*self.executor,
                    operations::delete_issue(id),
                    &["deleteIssue", "repository"],
                )
                .await?;
                remove_confirmed(store, id)?;
                info!(%id, "issue deleted");
                Ok(())
            })
            .await
    }

    fn resolve_logins(&self, logins: &[String]) -> Result<Vec<EntityId>, StoreError> {
        let users = self.stores.users.get_all();
        logins
            .iter()
            .map(|login| {
                users
                    .iter()
                    .find(|user| user.login.eq_ignore_ascii_case(login))
                    .map(|user| user.id.clone())
                    .ok_or_else(|| StoreError::not_found(EntityKind::User, login.as_str()))
            })
            .collect()
    }
}
