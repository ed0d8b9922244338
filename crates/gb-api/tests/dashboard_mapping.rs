use gb_api::schema::ViewerData;
use gb_api::{GraphqlResponse, map_dashboard};
use gb_core::{EntityId, IssueState, RepositoryPermission};
use pretty_assertions::assert_eq;

const DASHBOARD: &str = include_str!("fixtures/dashboard.json");

fn fixture() -> ViewerData {
    let response: GraphqlResponse = serde_json::from_str(DASHBOARD).unwrap();
    response.into_result().unwrap()
}

#[test]
fn dashboard_counts() {
    let snapshot = map_dashboard(&fixture());
    insta::assert_json_snapshot!(snapshot.counts(), @r#"
    {
      "projects": 2,
      "repositories": 2,
      "users": 3,
      "issues": 2,
      "labels": 3,
      "collaborators": 2
    }
    "#);
}

#[test]
fn dashboard_viewer_and_users() {
    let snapshot = map_dashboard(&fixture());
    assert_eq!(snapshot.viewer_id, Some(EntityId::from("U_1")));

    let logins: Vec<&str> = snapshot.users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["octocat", "hubot", "monalisa"]);
    assert_eq!(snapshot.users[0].email, None);
    assert_eq!(snapshot.users[1].email.as_deref(), Some("hubot@example.com"));
}

#[test]
fn dashboard_projects() {
    let snapshot = map_dashboard(&fixture());
    let roadmap = &snapshot.projects[0];
    assert_eq!(roadmap.title, "Roadmap");
    assert_eq!(roadmap.item_count, 3);
    assert_eq!(roadmap.status_field_id.as_deref(), Some("F_1"));
    let columns: Vec<&str> = roadmap.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["Todo", "In Progress", "Done"]);

    let backlog = &snapshot.projects[1];
    assert!(backlog.closed);
    assert!(backlog.repositories.is_empty());
    assert!(backlog.status_field_id.is_none());
}

#[test]
fn dashboard_issues_skip_drafts_and_merge_boards() {
    let snapshot = map_dashboard(&fixture());
    let ids: Vec<&str> = snapshot.issues.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["I_1", "I_2"]);

    let crash = &snapshot.issues[0];
    assert_eq!(crash.project_items.len(), 2);
    assert_eq!(crash.project_items[0].column.as_deref(), Some("Todo"));
    assert_eq!(crash.project_items[1].project_id, EntityId::from("PVT_2"));

    let docs = &snapshot.issues[1];
    assert_eq!(docs.state, IssueState::Closed);
    assert_eq!(docs.body, "");
}

#[test]
fn dashboard_labels_and_collaborators() {
    let snapshot = map_dashboard(&fixture());
    let labels: Vec<&str> = snapshot.labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(labels, vec!["bug", "docs", "wontfix"]);

    let hubot = &snapshot.collaborators[0];
    assert_eq!(hubot.login, "hubot");
    assert_eq!(hubot.grants.len(), 2);
    assert_eq!(hubot.max_permission(), Some(RepositoryPermission::Write));

    let monalisa = &snapshot.collaborators[1];
    assert_eq!(monalisa.grants[0].permission, RepositoryPermission::Triage);
}

#[test]
fn mapping_twice_is_identical() {
    let data = fixture();
    assert_eq!(map_dashboard(&data), map_dashboard(&data));
}
