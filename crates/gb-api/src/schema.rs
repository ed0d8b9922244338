//! Serde shapes of the GraphQL responses.
//!
//! These mirror the selection sets in [`operations`](crate::operations), not
//! GitHub's full schema. Connections, nested objects and nodes inside a
//! connection are all optional, because GitHub nulls them out when the
//! viewer lacks access instead of failing the whole query.

use chrono::{DateTime, Utc};
use gb_core::{IssueState, RepositoryPermission};
use serde::Deserialize;

/// A `{ nodes, totalCount }` connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Connection<T> {
    /// Page of nodes. Individual nodes may be null.
    pub nodes: Option<Vec<Option<T>>>,
    /// Total number of nodes on the server, when selected.
    pub total_count: Option<u64>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: None,
            total_count: None,
        }
    }
}

impl<T> Connection<T> {
    /// Iterates the non-null nodes.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().flatten().flatten()
    }
}

/// Iterates the non-null nodes of an optional connection.
///
/// # Examples
///
/// ```
/// use gb_api::schema::{Connection, nodes};
///
/// let conn: Connection<u32> = Connection { nodes: Some(vec![Some(1), None, Some(3)]), total_count: None };
/// assert_eq!(nodes(Some(&conn)).copied().collect::<Vec<_>>(), vec![1, 3]);
/// assert_eq!(nodes::<u32>(None).count(), 0);
/// ```
pub fn nodes<T>(connection: Option<&Connection<T>>) -> impl Iterator<Item = &T> {
    connection.into_iter().flat_map(Connection::iter)
}

/// An `{ edges }` connection, used where the edge carries data (collaborator permission).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeConnection<E> {
    /// Page of edges. Individual edges may be null.
    pub edges: Option<Vec<Option<E>>>,
}

impl<E> Default for EdgeConnection<E> {
    fn default() -> Self {
        Self { edges: None }
    }
}

impl<E> EdgeConnection<E> {
    /// Iterates the non-null edges.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.edges.iter().flatten().flatten()
    }
}

/// Top-level `data` of every viewer query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerData {
    /// The authenticated user.
    pub viewer: Option<ViewerNode>,
}

/// The authenticated user and whichever connections the query selected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerNode {
    /// Node id.
    pub id: String,
    /// Login.
    pub login: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email, empty string when private.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Boards.
    #[serde(default)]
    pub projects_v2: Option<Connection<ProjectNode>>,
    /// Owned repositories.
    #[serde(default)]
    pub repositories: Option<Connection<RepositoryNode>>,
}

/// Anything with a login: board owners, repository owners, issue authors, assignees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginNode {
    /// Login, absent for ghost users or unmatched inline fragments.
    pub login: Option<String>,
}

/// `ProjectFields`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    /// Node id.
    pub id: String,
    /// Board number.
    #[serde(default)]
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub url: String,
    /// Closed flag.
    #[serde(default)]
    pub closed: bool,
    /// Public flag.
    #[serde(default)]
    pub public: bool,
    /// Last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Owner.
    #[serde(default)]
    pub owner: Option<LoginNode>,
    /// Linked repositories.
    #[serde(default)]
    pub repositories: Option<Connection<RepositoryRefNode>>,
    /// The "Status" field. An empty object when the field is not single-select.
    #[serde(default)]
    pub field: Option<StatusFieldNode>,
    /// Board items.
    #[serde(default)]
    pub items: Option<Connection<ProjectItemNode>>,
}

/// `{ id nameWithOwner }` of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRefNode {
    /// Node id.
    pub id: String,
    /// `owner/name`.
    pub name_with_owner: String,
}

/// The single-select "Status" field of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusFieldNode {
    /// Field id.
    pub id: Option<String>,
    /// Options in board order.
    pub options: Option<Vec<StatusOptionNode>>,
}

/// One option of the "Status" field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusOptionNode {
    /// Option id.
    pub id: String,
    /// Option name.
    pub name: String,
}

/// A board item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemNode {
    /// Item id.
    pub id: String,
    /// The item's "Status" value, if set.
    #[serde(default)]
    pub field_value_by_name: Option<FieldValueNode>,
    /// What the item points at.
    #[serde(default)]
    pub content: Option<ItemContent>,
}

/// A single-select field value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldValueNode {
    /// Option name.
    pub name: Option<String>,
    /// Option id.
    pub option_id: Option<String>,
}

/// Item content, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum ItemContent {
    /// An issue.
    Issue(IssueNode),
    /// Draft issues and pull requests; not tracked.
    #[serde(other)]
    Other,
}

/// `IssueFields`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    /// Node id.
    pub id: String,
    /// Issue number.
    #[serde(default)]
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Body.
    #[serde(default)]
    pub body: Option<String>,
    /// State.
    #[serde(default)]
    pub state: IssueState,
    /// Web URL.
    #[serde(default)]
    pub url: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Author.
    #[serde(default)]
    pub author: Option<LoginNode>,
    /// Owning repository.
    #[serde(default)]
    pub repository: Option<RepositoryRefNode>,
    /// Labels.
    #[serde(default)]
    pub labels: Option<Connection<LabelNode>>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Option<Connection<LoginNode>>,
}

/// A label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelNode {
    /// Node id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Hex colour.
    #[serde(default)]
    pub color: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// `RepositoryFields`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    /// Node id.
    pub id: String,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// `owner/name`.
    pub name_with_owner: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub url: String,
    /// Private flag.
    #[serde(default)]
    pub is_private: bool,
    /// Archived flag.
    #[serde(default)]
    pub is_archived: bool,
    /// Stars.
    #[serde(default)]
    pub stargazer_count: u64,
    /// Last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Owner.
    #[serde(default)]
    pub owner: Option<LoginNode>,
    /// Labels.
    #[serde(default)]
    pub labels: Option<Connection<LabelNode>>,
    /// Collaborators with their permission. Null without push access.
    #[serde(default)]
    pub collaborators: Option<EdgeConnection<CollaboratorEdge>>,
}

/// A collaborator edge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollaboratorEdge {
    /// Permission on the repository.
    pub permission: RepositoryPermission,
    /// The user.
    #[serde(default)]
    pub node: Option<UserNode>,
}

/// A user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    /// Node id.
    pub id: String,
    /// Login.
    pub login: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// `{ id state }` returned by close/reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IssueStateNode {
    /// New state.
    pub state: IssueState,
}

/// `{ id }` returned by several mutations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdNode {
    /// Node id.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_content_discriminates_on_typename() {
        let issue: ItemContent = serde_json::from_value(json!({
            "__typename": "Issue",
            "id": "I_1",
            "number": 7,
            "title": "Crash",
            "state": "CLOSED"
        }))
        .unwrap();
        assert!(matches!(
            issue,
            ItemContent::Issue(ref node) if node.number == 7 && node.state == IssueState::Closed
        ));

        let draft: ItemContent =
            serde_json::from_value(json!({ "__typename": "DraftIssue" })).unwrap();
        assert_eq!(draft, ItemContent::Other);
    }

    #[test]
    fn test_null_connections_deserialize() {
        let repo: RepositoryNode = serde_json::from_value(json!({
            "id": "R_1",
            "nameWithOwner": "octocat/hello",
            "labels": null,
            "collaborators": null,
            "owner": null
        }))
        .unwrap();
        assert!(repo.labels.is_none());
        assert!(repo.collaborators.is_none());
        assert_eq!(nodes(repo.labels.as_ref()).count(), 0);
    }

    #[test]
    fn test_non_single_select_status_field_is_empty_object() {
        let field: StatusFieldNode = serde_json::from_value(json!({})).unwrap();
        assert!(field.id.is_none());
        assert!(field.options.is_none());
    }
}
