//! Issues placed on project boards.
//!
//! An issue can sit on several boards at once. Each placement is a
//! [`ProjectItemRef`]: the board, the item id GitHub assigned on that board,
//! and the name of the column ("Status" option) it currently sits in.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{
    Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci, filter_eq_str,
};
use super::label::LabelSummary;
use super::repository::RepositorySummary;

/// Open or closed, spelled the way GitHub sends it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    /// The issue is open.
    #[default]
    Open,
    /// The issue is closed.
    Closed,
}

impl IssueState {
    /// Returns the GitHub spelling (`OPEN` / `CLOSED`).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placement of an issue on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectItemRef {
    /// The board.
    pub project_id: EntityId,
    /// The item id on that board, needed to move the issue between columns.
    pub item_id: String,
    /// Current column name, if the board has a "Status" field and it is set.
    pub column: Option<String>,
}

/// An issue reachable from one of the viewer's boards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Node id.
    pub id: EntityId,
    /// Issue number within its repository.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Open or closed.
    pub state: IssueState,
    /// Web URL.
    pub url: String,
    /// Owning repository.
    pub repository: RepositorySummary,
    /// Author login, absent for deleted accounts.
    pub author_login: Option<String>,
    /// Labels.
    pub labels: SmallVec<[LabelSummary; 4]>,
    /// Assignee logins.
    pub assignees: SmallVec<[String; 2]>,
    /// Board placements.
    pub project_items: Vec<ProjectItemRef>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Creates an open issue with no labels, assignees, or placements.
    #[must_use]
    pub fn new(
        id: EntityId,
        number: u64,
        title: impl Into<String>,
        repository: RepositorySummary,
    ) -> Self {
        Self {
            id,
            number,
            title: title.into(),
            body: String::new(),
            state: IssueState::Open,
            url: String::new(),
            repository,
            author_login: None,
            labels: SmallVec::new(),
            assignees: SmallVec::new(),
            project_items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the placement of this issue on `project_id`, if any.
    #[must_use]
    pub fn item_on(&self, project_id: &EntityId) -> Option<&ProjectItemRef> {
        self.project_items
            .iter()
            .find(|item| &item.project_id == project_id)
    }

    /// Adds or replaces the placement for the same board.
    pub fn upsert_placement(&mut self, placement: &ProjectItemRef) {
        match self
            .project_items
            .iter_mut()
            .find(|item| item.project_id == placement.project_id)
        {
            Some(existing) => existing.clone_from(placement),
            None => self.project_items.push(placement.clone()),
        }
    }

    /// Returns `true` if the issue carries a label with this name (case-insensitive).
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels
            .iter()
            .any(|label| label.name.eq_ignore_ascii_case(name))
    }
}

/// Partial update for an [`Issue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePatch {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New state.
    pub state: Option<IssueState>,
    /// Replace the labels.
    pub labels: Option<SmallVec<[LabelSummary; 4]>>,
    /// Replace the assignees.
    pub assignees: Option<SmallVec<[String; 2]>>,
    /// Add or replace the placement on one board.
    pub placement: Option<ProjectItemRef>,
}

impl Entity for Issue {
    type Patch = IssuePatch;

    const KIND: EntityKind = EntityKind::Issue;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &IssuePatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(body) = &patch.body {
            self.body.clone_from(body);
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(labels) = &patch.labels {
            self.labels.clone_from(labels);
        }
        if let Some(assignees) = &patch.assignees {
            self.assignees.clone_from(assignees);
        }
        if let Some(placement) = &patch.placement {
            self.upsert_placement(placement);
        }
    }
}

impl Searchable for Issue {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle)
            || contains_ci(&self.body, needle)
            || contains_ci(&self.repository.name_with_owner, needle)
            || self.labels.iter().any(|l| contains_ci(&l.name, needle))
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => cmp_ci(&self.title, &other.title),
            "number" => self.number.cmp(&other.number),
            "created_at" => self.created_at.cmp(&other.created_at),
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            "state" => self.state.as_str().cmp(other.state.as_str()),
            _ => Ordering::Equal,
        }
    }

    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "state" => filter_eq_str(self.state.as_str(), value),
            "label" => value.as_str().is_some_and(|name| self.has_label(name)),
            "repository" => filter_eq_str(&self.repository.name_with_owner, value),
            "assignee" => self.assignees.iter().any(|a| filter_eq_str(a, value)),
            "project" => self
                .project_items
                .iter()
                .any(|item| filter_eq_str(item.project_id.as_str(), value)),
            "column" => self
                .project_items
                .iter()
                .filter_map(|item| item.column.as_deref())
                .any(|column| filter_eq_str(column, value)),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smallvec::smallvec;

    fn repo() -> RepositorySummary {
        RepositorySummary {
            id: EntityId::from("R_1"),
            name_with_owner: "octocat/hello".to_owned(),
        }
    }

    fn placement(project: &str, column: &str) -> ProjectItemRef {
        ProjectItemRef {
            project_id: EntityId::from(project),
            item_id: format!("PVTI_{project}"),
            column: Some(column.to_owned()),
        }
    }

    #[test]
    fn test_state_serializes_like_github() {
        assert_eq!(serde_json::to_string(&IssueState::Closed).unwrap(), r#""CLOSED""#);
        let state: IssueState = serde_json::from_str(r#""OPEN""#).unwrap();
        assert_eq!(state, IssueState::Open);
    }

    #[test]
    fn test_placement_patch_replaces_same_board() {
        let mut issue = Issue::new(EntityId::from("I_1"), 1, "Crash", repo());
        issue.upsert_placement(&placement("PVT_1", "Todo"));
        issue.upsert_placement(&placement("PVT_2", "Todo"));

        let patch = IssuePatch {
            placement: Some(placement("PVT_1", "Done")),
            ..IssuePatch::default()
        };
        issue.apply_patch(&patch);
        let once = issue.clone();
        issue.apply_patch(&patch);

        assert_eq!(issue, once);
        assert_eq!(issue.project_items.len(), 2);
        assert_eq!(
            issue.item_on(&EntityId::from("PVT_1")).and_then(|i| i.column.as_deref()),
            Some("Done")
        );
    }

    #[test]
    fn test_filters() {
        let mut issue = Issue::new(EntityId::from("I_1"), 1, "Crash", repo());
        issue.labels = smallvec![LabelSummary {
            id: EntityId::from("LA_1"),
            name: "bug".to_owned(),
            color: "d73a4a".to_owned(),
        }];
        issue.assignees = smallvec!["hubot".to_owned()];
        issue.upsert_placement(&placement("PVT_1", "In Progress"));

        assert!(issue.matches_filter("state", &json!("open")));
        assert!(!issue.matches_filter("state", &json!("CLOSED")));
        assert!(issue.matches_filter("label", &json!("Bug")));
        assert!(issue.matches_filter("assignee", &json!("hubot")));
        assert!(issue.matches_filter("column", &json!("in progress")));
        assert!(issue.matches_filter("project", &json!("PVT_1")));
        assert!(issue.matches_filter("repository", &json!("octocat/hello")));
    }

    #[test]
    fn test_query_matches_label_names() {
        let mut issue = Issue::new(EntityId::from("I_1"), 1, "Crash", repo());
        issue.labels.push(LabelSummary {
            id: EntityId::from("LA_2"),
            name: "regression".to_owned(),
            color: "000000".to_owned(),
        });
        assert!(issue.matches_query("regress"));
        assert!(issue.matches_query("hello"));
        assert!(!issue.matches_query("feature"));
    }
}
