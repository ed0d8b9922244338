use gb_core::{Collaborator, CollaboratorGrant, EntityId, RepositorySummary};

use super::{Dedup, non_empty};
use crate::schema::{ViewerData, nodes};

/// Folds the per-repository collaborator edges into one entity per person.
///
/// The viewer is skipped: owning a repository is not collaborating on it.
/// A person on several repositories gets one grant per repository.
#[must_use]
pub fn map_collaborators(data: &ViewerData) -> Vec<Collaborator> {
    let Some(viewer) = data.viewer.as_ref() else {
        return Vec::new();
    };

    let mut out = Dedup::with_capacity(8);
    for repo in nodes(viewer.repositories.as_ref()) {
        let Some(edges) = repo.collaborators.as_ref() else {
            continue;
        };
        let repository = RepositorySummary {
            id: EntityId::from(repo.id.as_str()),
            name_with_owner: repo.name_with_owner.clone(),
        };
        for edge in edges.iter() {
            let Some(user) = edge.node.as_ref() else {
                continue;
            };
            if user.id == viewer.id {
                continue;
            }
            let collaborator = Collaborator {
                id: EntityId::from(user.id.as_str()),
                login: user.login.clone(),
                name: non_empty(user.name.as_ref()),
                avatar_url: user.avatar_url.clone(),
                grants: vec![CollaboratorGrant {
                    repository: repository.clone(),
                    permission: edge.permission,
                }],
            };
            out.push_with(collaborator, |kept, repeat| {
                for grant in repeat.grants {
                    kept.merge_grant(grant);
                }
            });
        }
    }
    out.into_vec()
}
