//! Repositories and the lightweight summary embedded in other entities.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{
    Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci, filter_eq_bool, filter_eq_str,
};

/// A repository reference embedded in projects, issues and collaborator grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository node id.
    pub id: EntityId,
    /// `owner/name`.
    pub name_with_owner: String,
}

/// A repository owned by (or shared with) the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Node id.
    pub id: EntityId,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub name_with_owner: String,
    /// Description, if set.
    pub description: Option<String>,
    /// Web URL.
    pub url: String,
    /// Whether the repository is private.
    pub is_private: bool,
    /// Whether the repository is archived.
    pub is_archived: bool,
    /// Login of the owner.
    pub owner_login: String,
    /// Star count.
    pub stargazer_count: u64,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Creates a public, unarchived repository with the given id, owner and name.
    #[must_use]
    pub fn new(id: EntityId, owner: &str, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            name_with_owner: format!("{owner}/{name}"),
            description: None,
            url: String::new(),
            is_private: false,
            is_archived: false,
            owner_login: owner.to_owned(),
            stargazer_count: 0,
            updated_at: None,
        }
    }

    /// Returns the embeddable summary of this repository.
    #[must_use]
    pub fn summary(&self) -> RepositorySummary {
        RepositorySummary {
            id: self.id.clone(),
            name_with_owner: self.name_with_owner.clone(),
        }
    }
}

/// Partial update for a [`Repository`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPatch {
    /// New short name. `name_with_owner` follows it.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Archive state.
    pub is_archived: Option<bool>,
}

impl Entity for Repository {
    type Patch = RepositoryPatch;

    const KIND: EntityKind = EntityKind::Repository;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &RepositoryPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
            self.name_with_owner = format!("{}/{}", self.owner_login, name);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(archived) = patch.is_archived {
            self.is_archived = archived;
        }
    }
}

impl Searchable for Repository {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.name_with_owner, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => cmp_ci(&self.name, &other.name),
            "name_with_owner" => cmp_ci(&self.name_with_owner, &other.name_with_owner),
            "stargazer_count" | "stars" => self.stargazer_count.cmp(&other.stargazer_count),
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            _ => Ordering::Equal,
        }
    }

    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "is_private" => filter_eq_bool(self.is_private, value),
            "is_archived" => filter_eq_bool(self.is_archived, value),
            "owner" => filter_eq_str(&self.owner_login, value),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rename_updates_name_with_owner() {
        let mut repo = Repository::new(EntityId::from("R_1"), "octocat", "hello");
        repo.apply_patch(&RepositoryPatch {
            name: Some("world".to_owned()),
            ..RepositoryPatch::default()
        });
        assert_eq!(repo.name, "world");
        assert_eq!(repo.name_with_owner, "octocat/world");
    }

    #[test]
    fn test_summary() {
        let repo = Repository::new(EntityId::from("R_1"), "octocat", "hello");
        let summary = repo.summary();
        assert_eq!(summary.id.as_str(), "R_1");
        assert_eq!(summary.name_with_owner, "octocat/hello");
    }

    #[test]
    fn test_query_covers_owner_and_description() {
        let mut repo = Repository::new(EntityId::from("R_1"), "octocat", "hello");
        repo.description = Some("A Sample".to_owned());
        assert!(repo.matches_query("octocat"));
        assert!(repo.matches_query("sample"));
        assert!(!repo.matches_query("zzz"));
    }

    #[test]
    fn test_filters() {
        let mut repo = Repository::new(EntityId::from("R_1"), "octocat", "hello");
        repo.is_private = true;
        assert!(repo.matches_filter("is_private", &json!(true)));
        assert!(!repo.matches_filter("is_archived", &json!(true)));
        assert!(repo.matches_filter("owner", &json!("octocat")));
    }
}
