use gb_core::{EntityId, User};

use super::{Dedup, non_empty};
use crate::schema::{UserNode, ViewerData, ViewerNode, nodes};

/// Maps one user node.
#[must_use]
pub fn map_user(node: &UserNode) -> User {
    User {
        id: EntityId::from(node.id.as_str()),
        login: node.login.clone(),
        name: non_empty(node.name.as_ref()),
        email: non_empty(node.email.as_ref()),
        avatar_url: node.avatar_url.clone(),
    }
}

fn map_viewer(viewer: &ViewerNode) -> User {
    User {
        id: EntityId::from(viewer.id.as_str()),
        login: viewer.login.clone(),
        name: non_empty(viewer.name.as_ref()),
        email: non_empty(viewer.email.as_ref()),
        avatar_url: viewer.avatar_url.clone(),
    }
}

/// Collects the viewer followed by every collaborator on the viewer's
/// repositories. A user seen on several repositories appears once.
#[must_use]
pub fn map_users(data: &ViewerData) -> Vec<User> {
    let Some(viewer) = data.viewer.as_ref() else {
        return Vec::new();
    };

    let mut out = Dedup::with_capacity(8);
    out.push(map_viewer(viewer));
    let collaborators = nodes(viewer.repositories.as_ref())
        .filter_map(|repo| repo.collaborators.as_ref())
        .flat_map(|edges| edges.iter())
        .filter_map(|edge| edge.node.as_ref());
    for node in collaborators {
        out.push(map_user(node));
    }
    out.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_viewer_first_and_private_email_dropped() {
        let data: ViewerData = serde_json::from_value(json!({
            "viewer": {
                "id": "U_1",
                "login": "octocat",
                "email": "",
                "repositories": { "nodes": [
                    { "id": "R_1", "nameWithOwner": "octocat/a", "collaborators": { "edges": [
                        { "permission": "ADMIN", "node": { "id": "U_1", "login": "octocat" } },
                        { "permission": "WRITE", "node": { "id": "U_2", "login": "hubot" } }
                    ] } },
                    { "id": "R_2", "nameWithOwner": "octocat/b", "collaborators": { "edges": [
                        { "permission": "READ", "node": { "id": "U_2", "login": "hubot" } }
                    ] } }
                ] }
            }
        }))
        .unwrap();

        let users = map_users(&data);
        let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["octocat", "hubot"]);
        assert!(users[0].email.is_none());
    }
}
