//! GraphQL documents and their variable builders.
//!
//! Fragments are `macro_rules!` string literals so every document can be
//! assembled with `concat!` at compile time. Every document that pulls in a
//! fragment declares `$first`, the page size used for nested connections.

use gb_core::{EntityId, IssueState};
use serde::Serialize;
use serde_json::{Value, json};

use crate::request::GraphqlRequest;

macro_rules! issue_fields {
    () => {
        r"
fragment IssueFields on Issue {
  id number title body state url createdAt updatedAt
  author { login }
  repository { id nameWithOwner }
  labels(first: 20) { nodes { id name color description } }
  assignees(first: 10) { nodes { login } }
}
"
    };
}

macro_rules! project_fields {
    () => {
        r#"
fragment ProjectFields on ProjectV2 {
  id number title shortDescription url closed public updatedAt
  owner { ... on User { login } ... on Organization { login } }
  repositories(first: $first) { nodes { id nameWithOwner } }
  field(name: "Status") { ... on ProjectV2SingleSelectField { id options { id name } } }
  items(first: $first) {
    totalCount
    nodes {
      id
      fieldValueByName(name: "Status") { ... on ProjectV2ItemFieldSingleSelectValue { name optionId } }
      content { __typename ... on Issue { ...IssueFields } }
    }
  }
}
"#
    };
}

macro_rules! repository_fields {
    () => {
        r"
fragment RepositoryFields on Repository {
  id name nameWithOwner description url isPrivate isArchived stargazerCount updatedAt
  owner { login }
  labels(first: $first) { nodes { id name color description } }
  collaborators(first: $first) { edges { permission node { id login name email avatarUrl } } }
}
"
    };
}

macro_rules! viewer_fields {
    () => {
        "id login name email avatarUrl"
    };
}

/// The aggregated startup query: viewer, boards with their items, repositories
/// with their labels and collaborators.
pub const DASHBOARD_QUERY: &str = concat!(
    "query Dashboard($first: Int!) {\n  viewer {\n    ",
    viewer_fields!(),
    "\n    projectsV2(first: $first) { nodes { ...ProjectFields } }",
    "\n    repositories(first: $first, ownerAffiliations: [OWNER], orderBy: {field: UPDATED_AT, direction: DESC}) { nodes { ...RepositoryFields } }",
    "\n  }\n}\n",
    project_fields!(),
    issue_fields!(),
    repository_fields!(),
);

/// Boards and their items. Feeds the project and issue stores.
pub const PROJECTS_QUERY: &str = concat!(
    "query Projects($first: Int!) {\n  viewer {\n    ",
    viewer_fields!(),
    "\n    projectsV2(first: $first) { nodes { ...ProjectFields } }",
    "\n  }\n}\n",
    project_fields!(),
    issue_fields!(),
);

/// Repositories with labels and collaborators. Feeds the repository,
/// collaborator and user stores.
pub const REPOSITORIES_QUERY: &str = concat!(
    "query Repositories($first: Int!) {\n  viewer {\n    ",
    viewer_fields!(),
    "\n    repositories(first: $first, ownerAffiliations: [OWNER], orderBy: {field: UPDATED_AT, direction: DESC}) { nodes { ...RepositoryFields } }",
    "\n  }\n}\n",
    repository_fields!(),
);

/// Creates a board owned by a user or organization.
pub const CREATE_PROJECT: &str = concat!(
    "mutation CreateProject($first: Int!, $ownerId: ID!, $title: String!) {\n",
    "  createProjectV2(input: {ownerId: $ownerId, title: $title}) { projectV2 { ...ProjectFields } }\n}\n",
    project_fields!(),
    issue_fields!(),
);

/// Updates board title, description, visibility or closed state.
pub const UPDATE_PROJECT: &str = concat!(
    "mutation UpdateProject($first: Int!, $projectId: ID!, $title: String, $shortDescription: String, $closed: Boolean, $public: Boolean) {\n",
    "  updateProjectV2(input: {projectId: $projectId, title: $title, shortDescription: $shortDescription, closed: $closed, public: $public}) { projectV2 { ...ProjectFields } }\n}\n",
    project_fields!(),
    issue_fields!(),
);

/// Deletes a board.
pub const DELETE_PROJECT: &str = r"mutation DeleteProject($projectId: ID!) {
  deleteProjectV2(input: {projectId: $projectId}) { projectV2 { id } }
}
";

/// Links a repository to a board.
pub const LINK_PROJECT_REPOSITORY: &str = r"mutation LinkProjectRepository($projectId: ID!, $repositoryId: ID!) {
  linkProjectV2ToRepository(input: {projectId: $projectId, repositoryId: $repositoryId}) { repository { id nameWithOwner } }
}
";

/// Creates a repository for the viewer.
pub const CREATE_REPOSITORY: &str = concat!(
    "mutation CreateRepository($first: Int!, $name: String!, $description: String, $visibility: RepositoryVisibility!) {\n",
    "  createRepository(input: {name: $name, description: $description, visibility: $visibility}) { repository { ...RepositoryFields } }\n}\n",
    repository_fields!(),
);

/// Renames a repository or changes its description.
pub const UPDATE_REPOSITORY: &str = concat!(
    "mutation UpdateRepository($first: Int!, $repositoryId: ID!, $name: String, $description: String) {\n",
    "  updateRepository(input: {repositoryId: $repositoryId, name: $name, description: $description}) { repository { ...RepositoryFields } }\n}\n",
    repository_fields!(),
);

/// Archives a repository. GitHub's GraphQL API has no repository delete.
pub const ARCHIVE_REPOSITORY: &str = concat!(
    "mutation ArchiveRepository($first: Int!, $repositoryId: ID!) {\n",
    "  archiveRepository(input: {repositoryId: $repositoryId}) { repository { ...RepositoryFields } }\n}\n",
    repository_fields!(),
);

/// Reverses [`ARCHIVE_REPOSITORY`].
pub const UNARCHIVE_REPOSITORY: &str = concat!(
    "mutation UnarchiveRepository($first: Int!, $repositoryId: ID!) {\n",
    "  unarchiveRepository(input: {repositoryId: $repositoryId}) { repository { ...RepositoryFields } }\n}\n",
    repository_fields!(),
);

/// Opens an issue.
pub const CREATE_ISSUE: &str = concat!(
    "mutation CreateIssue($repositoryId: ID!, $title: String!, $body: String, $labelIds: [ID!], $assigneeIds: [ID!]) {\n",
    "  createIssue(input: {repositoryId: $repositoryId, title: $title, body: $body, labelIds: $labelIds, assigneeIds: $assigneeIds}) { issue { ...IssueFields } }\n}\n",
    issue_fields!(),
);

/// Edits title, body, labels or assignees of an issue.
pub const UPDATE_ISSUE: &str = concat!(
    "mutation UpdateIssue($id: ID!, $title: String, $body: String, $state: IssueState, $labelIds: [ID!], $assigneeIds: [ID!]) {\n",
    "  updateIssue(input: {id: $id, title: $title, body: $body, state: $state, labelIds: $labelIds, assigneeIds: $assigneeIds}) { issue { ...IssueFields } }\n}\n",
    issue_fields!(),
);

/// Closes an issue.
pub const CLOSE_ISSUE: &str = r"mutation CloseIssue($issueId: ID!) {
  closeIssue(input: {issueId: $issueId}) { issue { id state } }
}
";

/// Reopens an issue.
pub const REOPEN_ISSUE: &str = r"mutation ReopenIssue($issueId: ID!) {
  reopenIssue(input: {issueId: $issueId}) { issue { id state } }
}
";

/// Deletes an issue.
pub const DELETE_ISSUE: &str = r"mutation DeleteIssue($issueId: ID!) {
  deleteIssue(input: {issueId: $issueId}) { repository { id } }
}
";

/// Adds an issue to a board.
pub const ADD_PROJECT_ITEM: &str = r"mutation AddProjectItem($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) { item { id } }
}
";

/// Sets the "Status" single-select value of a board item.
pub const MOVE_PROJECT_ITEM: &str = r"mutation MoveProjectItem($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(input: {projectId: $projectId, itemId: $itemId, fieldId: $fieldId, value: {singleSelectOptionId: $optionId}}) { projectV2Item { id } }
}
";

/// Creates a label in a repository.
pub const CREATE_LABEL: &str = r"mutation CreateLabel($repositoryId: ID!, $name: String!, $color: String!, $description: String) {
  createLabel(input: {repositoryId: $repositoryId, name: $name, color: $color, description: $description}) { label { id name color description } }
}
";

/// Edits a label.
pub const UPDATE_LABEL: &str = r"mutation UpdateLabel($id: ID!, $name: String, $color: String, $description: String) {
  updateLabel(input: {id: $id, name: $name, color: $color, description: $description}) { label { id name color description } }
}
";

/// Deletes a label.
pub const DELETE_LABEL: &str = r"mutation DeleteLabel($id: ID!) {
  deleteLabel(input: {id: $id}) { clientMutationId }
}
";

/// Repository visibility for [`create_repository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Anyone can see it.
    Public,
    /// Only collaborators can see it.
    #[default]
    Private,
}

/// Builds the aggregated startup request.
///
/// # Examples
///
/// ```
/// use gb_api::operations;
///
/// let request = operations::dashboard(50);
/// assert_eq!(request.operation_name(), "Dashboard");
/// assert_eq!(request.variables["first"], 50);
/// ```
#[must_use]
pub fn dashboard(first: u32) -> GraphqlRequest {
    GraphqlRequest::new(DASHBOARD_QUERY, json!({ "first": first }))
}

/// Builds the board refetch request.
#[must_use]
pub fn projects(first: u32) -> GraphqlRequest {
    GraphqlRequest::new(PROJECTS_QUERY, json!({ "first": first }))
}

/// Builds the repository refetch request.
#[must_use]
pub fn repositories(first: u32) -> GraphqlRequest {
    GraphqlRequest::new(REPOSITORIES_QUERY, json!({ "first": first }))
}

/// Builds a [`CREATE_PROJECT`] request.
#[must_use]
pub fn create_project(first: u32, owner_id: &EntityId, title: &str) -> GraphqlRequest {
    GraphqlRequest::new(
        CREATE_PROJECT,
        json!({ "first": first, "ownerId": owner_id, "title": title }),
    )
}

/// Builds an [`UPDATE_PROJECT`] request. `None` fields are sent as `null`
/// and left unchanged by GitHub.
#[must_use]
pub fn update_project(
    first: u32,
    project_id: &EntityId,
    title: Option<&str>,
    short_description: Option<&str>,
    closed: Option<bool>,
    public: Option<bool>,
) -> GraphqlRequest {
    GraphqlRequest::new(
        UPDATE_PROJECT,
        json!({
            "first": first,
            "projectId": project_id,
            "title": title,
            "shortDescription": short_description,
            "closed": closed,
            "public": public,
        }),
    )
}

/// Builds a [`DELETE_PROJECT`] request.
#[must_use]
pub fn delete_project(project_id: &EntityId) -> GraphqlRequest {
    GraphqlRequest::new(DELETE_PROJECT, json!({ "projectId": project_id }))
}

/// Builds a [`LINK_PROJECT_REPOSITORY`] request.
#[must_use]
pub fn link_project_repository(project_id: &EntityId, repository_id: &EntityId) -> GraphqlRequest {
    GraphqlRequest::new(
        LINK_PROJECT_REPOSITORY,
        json!({ "projectId": project_id, "repositoryId": repository_id }),
    )
}

/// Builds a [`CREATE_REPOSITORY`] request.
#[must_use]
pub fn create_repository(
    first: u32,
    name: &str,
    description: Option<&str>,
    visibility: Visibility,
) -> GraphqlRequest {
    GraphqlRequest::new(
        CREATE_REPOSITORY,
        json!({
            "first": first,
            "name": name,
            "description": description,
            "visibility": visibility,
        }),
    )
}

/// Builds an [`UPDATE_REPOSITORY`] request.
#[must_use]
pub fn update_repository(
    first: u32,
    repository_id: &EntityId,
    name: Option<&str>,
    description: Option<&str>,
) -> GraphqlRequest {
    GraphqlRequest::new(
        UPDATE_REPOSITORY,
        json!({
            "first": first,
            "repositoryId": repository_id,
            "name": name,
            "description": description,
        }),
    )
}

/// Builds an [`ARCHIVE_REPOSITORY`] or [`UNARCHIVE_REPOSITORY`] request.
#[must_use]
pub fn set_repository_archived(
    first: u32,
    repository_id: &EntityId,
    archived: bool,
) -> GraphqlRequest {
    let query = if archived {
        ARCHIVE_REPOSITORY
    } else {
        UNARCHIVE_REPOSITORY
    };
    GraphqlRequest::new(query, json!({ "first": first, "repositoryId": repository_id }))
}

/// Builds a [`CREATE_ISSUE`] request.
#[must_use]
pub fn create_issue(
    repository_id: &EntityId,
    title: &str,
    body: Option<&str>,
    label_ids: &[EntityId],
    assignee_ids: &[EntityId],
) -> GraphqlRequest {
    GraphqlRequest::new(
        CREATE_ISSUE,
        json!({
            "repositoryId": repository_id,
            "title": title,
            "body": body,
            "labelIds": non_empty(label_ids),
            "assigneeIds": non_empty(assignee_ids),
        }),
    )
}

/// Fields accepted by [`update_issue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueUpdate<'a> {
    /// New title.
    pub title: Option<&'a str>,
    /// New body.
    pub body: Option<&'a str>,
    /// New state.
    pub state: Option<IssueState>,
    /// Replace the labels.
    pub label_ids: Option<&'a [EntityId]>,
    /// Replace the assignees.
    pub assignee_ids: Option<&'a [EntityId]>,
}

/// Builds an [`UPDATE_ISSUE`] request.
#[must_use]
pub fn update_issue(issue_id: &EntityId, update: IssueUpdate<'_>) -> GraphqlRequest {
    GraphqlRequest::new(
        UPDATE_ISSUE,
        json!({
            "id": issue_id,
            "title": update.title,
            "body": update.body,
            "state": update.state,
            "labelIds": update.label_ids,
            "assigneeIds": update.assignee_ids,
        }),
    )
}

/// Builds a [`CLOSE_ISSUE`] or [`REOPEN_ISSUE`] request.
#[must_use]
pub fn set_issue_state(issue_id: &EntityId, state: IssueState) -> GraphqlRequest {
    let query = match state {
        IssueState::Open => REOPEN_ISSUE,
        IssueState::Closed => CLOSE_ISSUE,
    };
    GraphqlRequest::new(query, json!({ "issueId": issue_id }))
}

/// Builds a [`DELETE_ISSUE`] request.
#[must_use]
pub fn delete_issue(issue_id: &EntityId) -> GraphqlRequest {
    GraphqlRequest::new(DELETE_ISSUE, json!({ "issueId": issue_id }))
}

/// Builds an [`ADD_PROJECT_ITEM`] request.
#[must_use]
pub fn add_project_item(project_id: &EntityId, content_id: &EntityId) -> GraphqlRequest {
    GraphqlRequest::new(
        ADD_PROJECT_ITEM,
        json!({ "projectId": project_id, "contentId": content_id }),
    )
}

/// Builds a [`MOVE_PROJECT_ITEM`] request.
#[must_use]
pub fn move_project_item(
    project_id: &EntityId,
    item_id: &str,
    field_id: &str,
    option_id: &str,
) -> GraphqlRequest {
    GraphqlRequest::new(
        MOVE_PROJECT_ITEM,
        json!({
            "projectId": project_id,
            "itemId": item_id,
            "fieldId": field_id,
            "optionId": option_id,
        }),
    )
}

/// Builds a [`CREATE_LABEL`] request.
#[must_use]
pub fn create_label(
    repository_id: &EntityId,
    name: &str,
    color: &str,
    description: Option<&str>,
) -> GraphqlRequest {
    GraphqlRequest::new(
        CREATE_LABEL,
        json!({
            "repositoryId": repository_id,
            "name": name,
            "color": color.trim_start_matches('#'),
            "description": description,
        }),
    )
}

/// Builds an [`UPDATE_LABEL`] request.
#[must_use]
pub fn update_label(
    label_id: &EntityId,
    name: Option<&str>,
    color: Option<&str>,
    description: Option<&str>,
) -> GraphqlRequest {
    GraphqlRequest::new(
        UPDATE_LABEL,
        json!({
            "id": label_id,
            "name": name,
            "color": color.map(|c| c.trim_start_matches('#')),
            "description": description,
        }),
    )
}

/// Builds a [`DELETE_LABEL`] request.
#[must_use]
pub fn delete_label(label_id: &EntityId) -> GraphqlRequest {
    GraphqlRequest::new(DELETE_LABEL, json!({ "id": label_id }))
}

fn non_empty(ids: &[EntityId]) -> Value {
    if ids.is_empty() {
        Value::Null
    } else {
        json!(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_declare_their_fragments_once() {
        for document in [DASHBOARD_QUERY, PROJECTS_QUERY, CREATE_PROJECT, UPDATE_PROJECT] {
            assert_eq!(document.matches("fragment ProjectFields").count(), 1);
            assert_eq!(document.matches("fragment IssueFields").count(), 1);
        }
        assert_eq!(DASHBOARD_QUERY.matches("fragment RepositoryFields").count(), 1);
        assert!(!PROJECTS_QUERY.contains("fragment RepositoryFields"));
    }

    #[test]
    fn test_documents_using_first_declare_it() {
        for document in [
            DASHBOARD_QUERY,
            PROJECTS_QUERY,
            REPOSITORIES_QUERY,
            CREATE_PROJECT,
            UPDATE_PROJECT,
            CREATE_REPOSITORY,
            UPDATE_REPOSITORY,
            ARCHIVE_REPOSITORY,
            UNARCHIVE_REPOSITORY,
        ] {
            assert!(document.contains("$first: Int!"), "{document}");
        }
        assert!(!CREATE_ISSUE.contains("$first"));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(dashboard(10).operation_name(), "Dashboard");
        assert_eq!(repositories(10).operation_name(), "Repositories");
        assert_eq!(
            set_issue_state(&EntityId::from("I_1"), IssueState::Closed).operation_name(),
            "CloseIssue"
        );
        assert_eq!(
            set_issue_state(&EntityId::from("I_1"), IssueState::Open).operation_name(),
            "ReopenIssue"
        );
    }

    #[test]
    fn test_create_issue_omits_empty_id_lists() {
        let request = create_issue(&EntityId::from("R_1"), "Bug", None, &[], &[]);
        assert!(request.variables["labelIds"].is_null());
        assert!(request.variables["assigneeIds"].is_null());
        assert!(request.variables["body"].is_null());
    }

    #[test]
    fn test_label_color_strips_hash() {
        let request = create_label(&EntityId::from("R_1"), "bug", "#d73a4a", None);
        assert_eq!(request.variables["color"], "d73a4a");
    }

    #[test]
    fn test_visibility_serializes_like_github() {
        let request = create_repository(10, "demo", None, Visibility::Public);
        assert_eq!(request.variables["visibility"], "PUBLIC");
    }
}
