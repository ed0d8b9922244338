use gb_core::{EntityId, Issue, LabelSummary, ProjectItemRef, RepositorySummary};

use super::{Dedup, repository_summary};
use crate::schema::{IssueNode, ItemContent, ViewerData, nodes};

/// Maps one issue node. Board placements are left empty; [`map_issues`]
/// fills them from the items the issue was found under.
#[must_use]
pub fn map_issue(node: &IssueNode) -> Issue {
    let repository = node.repository.as_ref().map_or_else(
        || RepositorySummary {
            id: EntityId::new(String::new()),
            name_with_owner: String::new(),
        },
        repository_summary,
    );

    Issue {
        id: EntityId::from(node.id.as_str()),
        number: node.number,
        title: node.title.clone(),
        body: node.body.clone().unwrap_or_default(),
        state: node.state,
        url: node.url.clone(),
        repository,
        author_login: node.author.as_ref().and_then(|a| a.login.clone()),
        labels: nodes(node.labels.as_ref())
            .map(|label| LabelSummary {
                id: EntityId::from(label.id.as_str()),
                name: label.name.clone(),
                color: label.color.clone(),
            })
            .collect(),
        assignees: nodes(node.assignees.as_ref())
            .filter_map(|a| a.login.clone())
            .collect(),
        project_items: Vec::new(),
        created_at: node.created_at,
        updated_at: node.updated_at,
    }
}

/// Collects the issues on every board.
///
/// An issue on several boards appears once, with one placement per board.
#[must_use]
pub fn map_issues(data: &ViewerData) -> Vec<Issue> {
    let Some(viewer) = data.viewer.as_ref() else {
        return Vec::new();
    };

    let mut out = Dedup::with_capacity(32);
    for project in nodes(viewer.projects_v2.as_ref()) {
        let project_id = EntityId::from(project.id.as_str());
        for item in nodes(project.items.as_ref()) {
            let Some(ItemContent::Issue(node)) = item.content.as_ref() else {
                continue;
            };
            let mut issue = map_issue(node);
            issue.project_items.push(ProjectItemRef {
                project_id: project_id.clone(),
                item_id: item.id.clone(),
                column: item
                    .field_value_by_name
                    .as_ref()
                    .and_then(|value| value.name.clone()),
            });
            out.push_with(issue, |kept, repeat| {
                for placement in &repeat.project_items {
                    kept.upsert_placement(placement);
                }
            });
        }
    }
    out.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_core::IssueState;
    use serde_json::json;

    fn board(id: &str, column: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "items": { "nodes": [{
                "id": format!("PVTI_{id}"),
                "fieldValueByName": column.map(|name| json!({ "name": name, "optionId": "o" })),
                "content": {
                    "__typename": "Issue",
                    "id": "I_1",
                    "number": 42,
                    "title": "Crash on start",
                    "body": null,
                    "state": "OPEN",
                    "author": null,
                    "repository": { "id": "R_1", "nameWithOwner": "octocat/hello" },
                    "assignees": { "nodes": [{ "login": "hubot" }, null] }
                }
            }] }
        })
    }

    #[test]
    fn test_issue_on_two_boards_merges_placements() {
        let data: ViewerData = serde_json::from_value(json!({
            "viewer": {
                "id": "U_1",
                "login": "octocat",
                "projectsV2": { "nodes": [board("PVT_1", Some("Todo")), board("PVT_2", None)] }
            }
        }))
        .unwrap();

        let issues = map_issues(&data);
        assert_eq!(issues.len(), 1);

        let issue = &issues[0];
        assert_eq!(issue.number, 42);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(issue.body, "");
        assert!(issue.author_login.is_none());
        assert_eq!(issue.assignees.as_slice(), ["hubot".to_owned()]);
        assert_eq!(issue.project_items.len(), 2);
        assert_eq!(issue.project_items[0].column.as_deref(), Some("Todo"));
        assert_eq!(issue.project_items[1].item_id, "PVTI_PVT_2");
        assert!(issue.project_items[1].column.is_none());
    }

    #[test]
    fn test_null_projects_connection() {
        let data: ViewerData = serde_json::from_value(json!({
            "viewer": { "id": "U_1", "login": "octocat", "projectsV2": null }
        }))
        .unwrap();
        assert!(map_issues(&data).is_empty());
    }
}
