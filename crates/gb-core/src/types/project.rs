//! Projects v2 boards.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{
    Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci, filter_eq_bool, filter_eq_str,
};
use super::repository::RepositorySummary;

/// One option of a board's "Status" single-select field, shown as a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectColumn {
    /// Option id, used when moving an item between columns.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A Projects v2 board.
///
/// Linked repositories are embedded summaries, not references into the
/// repository store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Node id.
    pub id: EntityId,
    /// Board number within the owner.
    pub number: u64,
    /// Board title.
    pub title: String,
    /// Short description, if the board has one.
    pub short_description: Option<String>,
    /// Web URL.
    pub url: String,
    /// Whether the board is closed.
    pub closed: bool,
    /// Whether the board is public.
    pub public: bool,
    /// Login of the owning user or organization.
    pub owner_login: String,
    /// Repositories linked to the board.
    pub repositories: Vec<RepositorySummary>,
    /// Id of the "Status" field, when the board has one.
    pub status_field_id: Option<String>,
    /// Columns in board order.
    pub columns: Vec<ProjectColumn>,
    /// Number of items on the board.
    pub item_count: u64,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Looks up a column by name, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use gb_core::{EntityId, Project, ProjectColumn};
    ///
    /// let mut project = Project::new(EntityId::from("PVT_1"), "Roadmap");
    /// project.columns.push(ProjectColumn { id: "opt1".into(), name: "In Progress".into() });
    ///
    /// assert_eq!(project.column_named("in progress").map(|c| c.id.as_str()), Some("opt1"));
    /// assert!(project.column_named("Done").is_none());
    /// ```
    #[must_use]
    pub fn column_named(&self, name: &str) -> Option<&ProjectColumn> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Creates an open, private board with only an id and a title.
    #[must_use]
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            number: 0,
            title: title.into(),
            short_description: None,
            url: String::new(),
            closed: false,
            public: false,
            owner_login: String::new(),
            repositories: Vec::new(),
            status_field_id: None,
            columns: Vec::new(),
            item_count: 0,
            updated_at: None,
        }
    }
}

/// Partial update for a [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    /// New title.
    pub title: Option<String>,
    /// New short description.
    pub short_description: Option<String>,
    /// Open or close the board.
    pub closed: Option<bool>,
    /// Change visibility.
    pub public: Option<bool>,
    /// Replace the linked repositories.
    pub repositories: Option<Vec<RepositorySummary>>,
}

impl Entity for Project {
    type Patch = ProjectPatch;

    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.short_description {
            self.short_description = Some(description.clone());
        }
        if let Some(closed) = patch.closed {
            self.closed = closed;
        }
        if let Some(public) = patch.public {
            self.public = public;
        }
        if let Some(repositories) = &patch.repositories {
            self.repositories.clone_from(repositories);
        }
    }
}

impl Searchable for Project {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle)
            || self
                .short_description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
            || contains_ci(&self.owner_login, needle)
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" | "name" => cmp_ci(&self.title, &other.title),
            "number" => self.number.cmp(&other.number),
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            "item_count" => self.item_count.cmp(&other.item_count),
            _ => Ordering::Equal,
        }
    }

    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "closed" => filter_eq_bool(self.closed, value),
            "public" => filter_eq_bool(self.public, value),
            "owner" => filter_eq_str(&self.owner_login, value),
            "repository" => self
                .repositories
                .iter()
                .any(|repo| filter_eq_str(&repo.name_with_owner, value)),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn board(id: &str, title: &str) -> Project {
        let mut project = Project::new(EntityId::from(id), title);
        project.owner_login = "octocat".to_owned();
        project
    }

    #[test]
    fn test_patch_is_shallow_and_idempotent() {
        let mut project = board("PVT_1", "Alpha");
        let patch = ProjectPatch {
            title: Some("Alpha v2".to_owned()),
            closed: Some(true),
            ..ProjectPatch::default()
        };

        project.apply_patch(&patch);
        let once = project.clone();
        project.apply_patch(&patch);

        assert_eq!(project, once);
        assert_eq!(project.title, "Alpha v2");
        assert!(project.closed);
        assert_eq!(project.owner_login, "octocat");
    }

    #[test]
    fn test_matches_query_on_title_description_owner() {
        let mut project = board("PVT_1", "Roadmap");
        project.short_description = Some("Quarterly Planning".to_owned());

        assert!(project.matches_query("road"));
        assert!(project.matches_query("planning"));
        assert!(project.matches_query("octo"));
        assert!(!project.matches_query("backlog"));
    }

    #[test]
    fn test_compare_by_id_is_equal() {
        let a = board("PVT_2", "A");
        let b = board("PVT_1", "B");
        assert_eq!(a.compare_by(&b, "id"), Ordering::Equal);
        assert_eq!(a.compare_by(&b, "title"), Ordering::Less);
    }

    #[test]
    fn test_filters() {
        let mut project = board("PVT_1", "Alpha");
        project.repositories.push(RepositorySummary {
            id: EntityId::from("R_1"),
            name_with_owner: "octocat/hello".to_owned(),
        });

        assert!(project.matches_filter("closed", &json!(false)));
        assert!(!project.matches_filter("closed", &json!(true)));
        assert!(project.matches_filter("owner", &json!("OctoCat")));
        assert!(project.matches_filter("repository", &json!("octocat/hello")));
        assert!(project.matches_filter("unknown", &json!(1)));
    }
}
