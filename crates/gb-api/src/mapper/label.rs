use gb_core::{EntityId, Label};

use super::Dedup;
use crate::schema::{ItemContent, LabelNode, ViewerData, nodes};

/// Maps one label node.
#[must_use]
pub fn map_label(node: &LabelNode) -> Label {
    Label {
        id: EntityId::from(node.id.as_str()),
        name: node.name.clone(),
        color: node.color.clone(),
        description: node.description.clone(),
    }
}

/// Collects every label the response mentions: repository labels first,
/// then labels found on board issues. The same label seen on many issues
/// appears once.
#[must_use]
pub fn map_labels(data: &ViewerData) -> Vec<Label> {
    let Some(viewer) = data.viewer.as_ref() else {
        return Vec::new();
    };

    let repo_labels =
        nodes(viewer.repositories.as_ref()).flat_map(|repo| nodes(repo.labels.as_ref()));
    let issue_labels = nodes(viewer.projects_v2.as_ref())
        .flat_map(|project| nodes(project.items.as_ref()))
        .filter_map(|item| match item.content.as_ref() {
            Some(ItemContent::Issue(issue)) => Some(issue),
            _ => None,
        })
        .flat_map(|issue| nodes(issue.labels.as_ref()));

    let mut out = Dedup::with_capacity(16);
    for node in repo_labels.chain(issue_labels) {
        out.push(map_label(node));
    }
    out.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels_deduplicated_across_items() {
        let data: ViewerData = serde_json::from_value(json!({
            "viewer": {
                "id": "U_1",
                "login": "octocat",
                "projectsV2": { "nodes": [{
                    "id": "PVT_1",
                    "items": { "nodes": [
                        { "id": "PVTI_1", "content": { "__typename": "Issue", "id": "I_1",
                          "labels": { "nodes": [{ "id": "LA_1", "name": "bug", "color": "d73a4a" }] } } },
                        { "id": "PVTI_2", "content": { "__typename": "Issue", "id": "I_2",
                          "labels": { "nodes": [{ "id": "LA_1", "name": "bug", "color": "d73a4a" },
                                                { "id": "LA_2", "name": "docs", "color": "0075ca" }] } } },
                        { "id": "PVTI_3", "content": { "__typename": "DraftIssue" } }
                    ] }
                }] },
                "repositories": { "nodes": [{
                    "id": "R_1",
                    "nameWithOwner": "octocat/hello",
                    "labels": { "nodes": [{ "id": "LA_2", "name": "docs", "color": "0075ca" }] }
                }] }
            }
        }))
        .unwrap();

        let labels = map_labels(&data);
        let ids: Vec<&str> = labels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["LA_2", "LA_1"]);
        assert_eq!(map_labels(&data), labels);
    }
}
