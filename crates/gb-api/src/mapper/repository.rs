use gb_core::{EntityId, Repository, RepositorySummary};

use super::Dedup;
use crate::schema::{RepositoryNode, RepositoryRefNode, ViewerData, nodes};

/// Maps a `{ id nameWithOwner }` reference.
#[must_use]
pub fn repository_summary(node: &RepositoryRefNode) -> RepositorySummary {
    RepositorySummary {
        id: EntityId::from(node.id.as_str()),
        name_with_owner: node.name_with_owner.clone(),
    }
}

/// Maps one repository node.
#[must_use]
pub fn map_repository(node: &RepositoryNode) -> Repository {
    let owner_login = node
        .owner
        .as_ref()
        .and_then(|owner| owner.login.clone())
        .or_else(|| {
            node.name_with_owner
                .split_once('/')
                .map(|(owner, _)| owner.to_owned())
        })
        .unwrap_or_default();

    Repository {
        id: EntityId::from(node.id.as_str()),
        name: node.name.clone(),
        name_with_owner: node.name_with_owner.clone(),
        description: node.description.clone(),
        url: node.url.clone(),
        is_private: node.is_private,
        is_archived: node.is_archived,
        owner_login,
        stargazer_count: node.stargazer_count,
        updated_at: node.updated_at,
    }
}

/// Maps the viewer's repositories.
#[must_use]
pub fn map_repositories(data: &ViewerData) -> Vec<Repository> {
    let connection = data.viewer.as_ref().and_then(|v| v.repositories.as_ref());
    let mut out = Dedup::with_capacity(nodes(connection).count());
    for node in nodes(connection) {
        out.push(map_repository(node));
    }
    out.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_falls_back_to_name_with_owner() {
        let node: RepositoryNode = serde_json::from_value(json!({
            "id": "R_1",
            "name": "hello",
            "nameWithOwner": "octocat/hello",
            "owner": null
        }))
        .unwrap();
        assert_eq!(map_repository(&node).owner_login, "octocat");
    }

    #[test]
    fn test_missing_viewer_is_empty() {
        assert!(map_repositories(&ViewerData::default()).is_empty());
    }
}
