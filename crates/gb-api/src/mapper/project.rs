use gb_core::{EntityId, Project, ProjectColumn};

use super::{Dedup, repository_summary};
use crate::schema::{ProjectNode, ViewerData, nodes};

/// Maps one board node.
///
/// `item_count` prefers the server's `totalCount` and falls back to the
/// number of items actually returned.
#[must_use]
pub fn map_project(node: &ProjectNode) -> Project {
    let repositories = nodes(node.repositories.as_ref())
        .map(repository_summary)
        .collect();

    let (status_field_id, columns) = node.field.as_ref().map_or((None, Vec::new()), |field| {
        let columns = field
            .options
            .iter()
            .flatten()
            .map(|option| ProjectColumn {
                id: option.id.clone(),
                name: option.name.clone(),
            })
            .collect();
        (field.id.clone(), columns)
    });

    let item_count = node.items.as_ref().map_or(0, |items| {
        items
            .total_count
            .unwrap_or_else(|| items.iter().count() as u64)
    });

    Project {
        id: EntityId::from(node.id.as_str()),
        number: node.number,
        title: node.title.clone(),
        short_description: node.short_description.clone(),
        url: node.url.clone(),
        closed: node.closed,
        public: node.public,
        owner_login: node
            .owner
            .as_ref()
            .and_then(|owner| owner.login.clone())
            .unwrap_or_default(),
        repositories,
        status_field_id,
        columns,
        item_count,
        updated_at: node.updated_at,
    }
}

/// Maps the viewer's boards.
#[must_use]
pub fn map_projects(data: &ViewerData) -> Vec<Project> {
    let connection = data.viewer.as_ref().and_then(|v| v.projects_v2.as_ref());
    let mut out = Dedup::with_capacity(nodes(connection).count());
    for node in nodes(connection) {
        out.push(map_project(node));
    }
    out.into_vec()
}
